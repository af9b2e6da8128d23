mod common;

use finsync::db::{insider_trade_repo, portfolio_repo};
use finsync::errors::StoreError;

use common::{clear_symbols, clear_tickers, dec, make_position, make_trade, setup_test_db};

#[tokio::test]
async fn test_portfolio_upsert_is_idempotent() {
    let pool = setup_test_db().await;
    clear_symbols(&pool, &["IDEM1", "IDEM2"]).await;

    let batch = vec![
        make_position("IDEM1", 100, "150.00"),
        make_position("IDEM2", 50, "400.00"),
    ];

    let first = portfolio_repo::upsert_positions(&pool, &batch)
        .await
        .expect("First application should succeed");
    assert_eq!(first, 2);

    let after_first = (
        portfolio_repo::get_position(&pool, "IDEM1").await.unwrap(),
        portfolio_repo::get_position(&pool, "IDEM2").await.unwrap(),
    );

    let second = portfolio_repo::upsert_positions(&pool, &batch)
        .await
        .expect("Second application should succeed");
    assert_eq!(second, 2);

    let after_second = (
        portfolio_repo::get_position(&pool, "IDEM1").await.unwrap(),
        portfolio_repo::get_position(&pool, "IDEM2").await.unwrap(),
    );

    // No duplicate rows, no column drift
    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn test_portfolio_second_sync_updates_in_place() {
    let pool = setup_test_db().await;
    clear_symbols(&pool, &["AAPL_SYNC"]).await;

    portfolio_repo::upsert_positions(&pool, &[make_position("AAPL_SYNC", 100, "150.00")])
        .await
        .expect("First sync should succeed");

    portfolio_repo::upsert_positions(&pool, &[make_position("AAPL_SYNC", 120, "151.00")])
        .await
        .expect("Second sync should succeed");

    let row = portfolio_repo::get_position(&pool, "AAPL_SYNC")
        .await
        .expect("DB query should succeed")
        .expect("Row should exist");

    assert_eq!(row.quantity, 120);
    assert_eq!(row.market_price, dec("151.00"));
}

#[tokio::test]
async fn test_insider_rescan_converges_on_latest_observation() {
    let pool = setup_test_db().await;
    clear_tickers(&pool, &["RESCAN"]).await;

    // Overlapping scan windows observe the same disclosure twice with a
    // revised price.
    insider_trade_repo::upsert_trades(&pool, &[make_trade("RESCAN", "Doe John", 1_000, "10.00")])
        .await
        .expect("First scan should succeed");
    insider_trade_repo::upsert_trades(&pool, &[make_trade("RESCAN", "Doe John", 1_000, "10.50")])
        .await
        .expect("Second scan should succeed");

    let rows = insider_trade_repo::get_trades_by_ticker(&pool, "RESCAN")
        .await
        .expect("DB query should succeed");

    assert_eq!(rows.len(), 1, "Rescan must never duplicate a disclosure");
    assert_eq!(rows[0].price_per_share, dec("10.50"));
    assert_eq!(rows[0].transaction_value, dec("10500.00"));
}

#[tokio::test]
async fn test_insider_same_key_twice_in_one_batch_keeps_latest() {
    let pool = setup_test_db().await;
    clear_tickers(&pool, &["DUPBATCH"]).await;

    let batch = vec![
        make_trade("DUPBATCH", "Roe Jane", 500, "20.00"),
        make_trade("DUPBATCH", "Roe Jane", 500, "21.00"),
    ];

    insider_trade_repo::upsert_trades(&pool, &batch)
        .await
        .expect("Batch should succeed");

    let rows = insider_trade_repo::get_trades_by_ticker(&pool, "DUPBATCH")
        .await
        .expect("DB query should succeed");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].price_per_share, dec("21.00"));
}

#[tokio::test]
async fn test_insider_distinct_keys_stay_distinct() {
    let pool = setup_test_db().await;
    clear_tickers(&pool, &["MULTI"]).await;

    // Same insider, same day, same type — different share counts are
    // different disclosures.
    let batch = vec![
        make_trade("MULTI", "Poe Kim", 100, "5.00"),
        make_trade("MULTI", "Poe Kim", 200, "5.00"),
    ];

    insider_trade_repo::upsert_trades(&pool, &batch)
        .await
        .expect("Batch should succeed");

    let rows = insider_trade_repo::get_trades_by_ticker(&pool, "MULTI")
        .await
        .expect("DB query should succeed");

    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_mid_batch_failure_rolls_back_everything() {
    let pool = setup_test_db().await;
    clear_tickers(&pool, &["ATOMIC_OK"]).await;

    // A ticker past the column limit fails the third statement; the two
    // records before it must not survive.
    let poison = make_trade(&"X".repeat(300), "Poison", 1, "1.00");
    let batch = vec![
        make_trade("ATOMIC_OK", "Doe John", 100, "10.00"),
        make_trade("ATOMIC_OK", "Roe Jane", 200, "10.00"),
        poison,
    ];

    let result = insider_trade_repo::upsert_trades(&pool, &batch).await;
    assert!(matches!(result, Err(StoreError::Connection(_))));

    let rows = insider_trade_repo::get_trades_by_ticker(&pool, "ATOMIC_OK")
        .await
        .expect("DB query should succeed");

    assert!(rows.is_empty(), "Partial batch must not be committed");
}

#[tokio::test]
async fn test_empty_batches_are_a_no_op() {
    let pool = setup_test_db().await;

    let positions = portfolio_repo::upsert_positions(&pool, &[])
        .await
        .expect("Empty portfolio batch should succeed");
    let trades = insider_trade_repo::upsert_trades(&pool, &[])
        .await
        .expect("Empty trade batch should succeed");

    assert_eq!(positions, 0);
    assert_eq!(trades, 0);
}
