//! `comanda-stock` — inbound stock movements (`StockEntry`) and physical
//! stock reconciliation sessions (`StockCount`).

pub mod count;
pub mod entry;

pub use count::{StockCount, StockCountId, StockCountLine, StockCountStatus};
pub use entry::{StockEntry, StockEntryId, StockEntryLine};
