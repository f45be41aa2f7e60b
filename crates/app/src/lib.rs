//! Application layer: repository ports, in-memory adapters and the use cases
//! that orchestrate the domain aggregates.

pub mod error;
pub mod memory;
pub mod ports;
pub mod use_cases;

pub use error::{AppError, AppResult};
pub use ports::{
    ItemRepository, OrderRepository, Page, Pagination, StockCountRepository,
    StockEntryRepository, StoreError, StoreResult,
};
