pub mod insider_trade;
pub mod position;

pub use insider_trade::{InsiderTrade, InsiderTradeRow, RawInsiderTrade};
pub use position::{Position, RawPosition};
