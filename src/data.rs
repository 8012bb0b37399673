pub mod parser;
pub mod record;

pub use record::{StockRecord, Trend};
