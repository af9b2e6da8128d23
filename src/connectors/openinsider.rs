use reqwest::Client;
use scraper::{Html, Selector};

use super::Connector;
use crate::errors::FetchError;
use crate::models::RawInsiderTrade;

/// Number of cells in a well-formed listing row; rows with any other
/// shape (headers, separators, promos) are skipped.
const LISTING_ROW_CELLS: usize = 13;

/// Scrapes the public insider-trade listing. One GET against a fixed
/// URL; the rows live in a `table.tinytable` element. A missing or
/// malformed table is not fatal — the listing page occasionally serves
/// a degraded layout, and an empty batch lets the run finish clean.
#[derive(Debug, Clone)]
pub struct InsiderListingConnector {
    http: Client,
    listing_url: String,
}

impl InsiderListingConnector {
    pub fn new(http: Client, listing_url: String) -> Self {
        Self { http, listing_url }
    }
}

impl Connector for InsiderListingConnector {
    type Record = RawInsiderTrade;

    async fn fetch(&self) -> Result<Vec<RawInsiderTrade>, FetchError> {
        let body = self
            .http
            .get(&self.listing_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(parse_listing(&body))
    }
}

/// Extract raw trade rows from the listing markup. Column positions
/// match the source table: date 2, ticker 3, insider 5, relationship 6,
/// type 7, shares 8, value 9, price 10.
pub fn parse_listing(html: &str) -> Vec<RawInsiderTrade> {
    let table_sel = Selector::parse("table.tinytable").expect("static selector");
    let row_sel = Selector::parse("tr").expect("static selector");
    let cell_sel = Selector::parse("td").expect("static selector");

    let doc = Html::parse_document(html);
    let Some(table) = doc.select(&table_sel).next() else {
        return Vec::new();
    };

    let mut trades = Vec::new();
    for row in table.select(&row_sel).skip(1) {
        let cells: Vec<String> = row
            .select(&cell_sel)
            .map(|c| c.text().collect::<String>().trim().to_string())
            .collect();

        if cells.len() != LISTING_ROW_CELLS {
            continue;
        }

        trades.push(RawInsiderTrade {
            ticker: cells[3].clone(),
            insider_name: cells[5].clone(),
            relationship: cells[6].clone(),
            transaction_date: cells[2].clone(),
            transaction_type: cells[7].clone(),
            value: cells[9].clone(),
            shares: cells[8].clone(),
            price_per_share: cells[10].clone(),
        });
    }

    trades
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_row(cells: [&str; LISTING_ROW_CELLS]) -> String {
        let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
        format!("<tr>{tds}</tr>")
    }

    fn listing_page(rows: &[String]) -> String {
        format!(
            "<html><body><table class=\"tinytable\">\
             <tr><th>X</th></tr>{}</table></body></html>",
            rows.concat()
        )
    }

    #[test]
    fn test_parses_well_formed_rows() {
        let row = listing_row([
            "D", "2024-01-16", "2024-01-12", "AAPL", "Apple Inc", "Doe John",
            "CEO", "P - Purchase", "10,000", "$1,500,000", "$150.00", "1%", "+5%",
        ]);
        let trades = parse_listing(&listing_page(&[row]));

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].ticker, "AAPL");
        assert_eq!(trades[0].insider_name, "Doe John");
        assert_eq!(trades[0].relationship, "CEO");
        assert_eq!(trades[0].transaction_date, "2024-01-12");
        assert_eq!(trades[0].transaction_type, "P - Purchase");
        assert_eq!(trades[0].value, "$1,500,000");
        assert_eq!(trades[0].shares, "10,000");
        assert_eq!(trades[0].price_per_share, "$150.00");
    }

    #[test]
    fn test_skips_rows_with_wrong_cell_count() {
        let good = listing_row([
            "D", "2024-01-16", "2024-01-12", "MSFT", "Microsoft", "Roe Jane",
            "CFO", "P - Purchase", "500", "$200,000", "$400.00", "1%", "+2%",
        ]);
        let bad = "<tr><td>only</td><td>four</td><td>cells</td><td>here</td></tr>".to_string();
        let trades = parse_listing(&listing_page(&[bad, good]));

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].ticker, "MSFT");
    }

    #[test]
    fn test_missing_table_yields_empty() {
        assert!(parse_listing("<html><body><p>maintenance</p></body></html>").is_empty());
    }

    #[test]
    fn test_table_with_only_header_yields_empty() {
        assert!(parse_listing(&listing_page(&[])).is_empty());
    }
}
