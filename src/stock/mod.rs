mod app;
mod store;

pub use app::StockApp;
pub use store::{StockStore, STOCK_HEADERS};
