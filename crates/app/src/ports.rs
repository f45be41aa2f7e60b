//! Outbound ports: persistence boundaries the use cases depend on.
//!
//! Ports make no storage assumptions; adapters live in [`crate::memory`]
//! (and, eventually, behind a real database).

use thiserror::Error;

use comanda_catalog::{Item, ItemId};
use comanda_sales::{Order, OrderId};
use comanda_stock::{StockCount, StockCountId, StockEntry, StockEntryId};

#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend failure (I/O, poisoned lock, connection, ...).
    #[error("storage failure: {0}")]
    Storage(String),
    /// A unique constraint (sku, barcode) was violated.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait ItemRepository {
    fn find_by_id(&self, id: ItemId) -> StoreResult<Option<Item>>;
    fn find_by_barcode(&self, barcode: &str) -> StoreResult<Option<Item>>;
    fn find_all(&self) -> StoreResult<Vec<Item>>;
    fn save(&self, item: &Item) -> StoreResult<()>;
    fn delete(&self, id: ItemId) -> StoreResult<bool>;
}

pub trait OrderRepository {
    fn find_by_id(&self, id: OrderId) -> StoreResult<Option<Order>>;
    fn find_all(&self) -> StoreResult<Vec<Order>>;
    fn save(&self, order: &Order) -> StoreResult<()>;
    fn delete(&self, id: OrderId) -> StoreResult<bool>;
    /// Next comanda number (COM-0001, COM-0002, ...).
    fn next_com_number(&self) -> StoreResult<String>;
}

pub trait StockEntryRepository {
    fn find_by_id(&self, id: StockEntryId) -> StoreResult<Option<StockEntry>>;
    fn find_all(&self) -> StoreResult<Vec<StockEntry>>;
    fn save(&self, entry: &StockEntry) -> StoreResult<()>;
    fn delete(&self, id: StockEntryId) -> StoreResult<bool>;
}

pub trait StockCountRepository {
    fn find_by_id(&self, id: StockCountId) -> StoreResult<Option<StockCount>>;
    fn find_all(&self) -> StoreResult<Vec<StockCount>>;
    fn save(&self, count: &StockCount) -> StoreResult<()>;
    fn delete(&self, id: StockCountId) -> StoreResult<bool>;
}

/// Pagination request for list use cases. `All` disables pagination
/// (label printing and exports read the whole catalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    All,
    Page { page: u32, limit: u32 },
}

impl Pagination {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 5;
    pub const MAX_LIMIT: u32 = 100;

    /// Page request with out-of-range values clamped instead of rejected.
    pub fn page(page: u32, limit: u32) -> Self {
        Pagination::Page {
            page: page.max(1),
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination::Page {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// One page of a filtered listing, with the usual pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: usize,
    /// 1-based page actually served (clamped to the last page).
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Slices `filtered` according to `pagination`. A past-the-end page
    /// request serves the last page rather than an empty one.
    pub fn paginate(filtered: Vec<T>, pagination: Pagination) -> Self {
        let total = filtered.len();
        let (page, limit) = match pagination {
            Pagination::All => {
                let limit = total.max(1) as u32;
                return Self {
                    data: filtered,
                    total,
                    page: 1,
                    limit,
                    total_pages: 1,
                };
            }
            Pagination::Page { page, limit } => {
                (page.max(1), limit.clamp(1, Pagination::MAX_LIMIT))
            }
        };

        let total_pages = (total.div_ceil(limit as usize)).max(1) as u32;
        let current_page = page.min(total_pages);
        let skip = (current_page - 1) as usize * limit as usize;
        let data = filtered
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .collect();

        Self {
            data,
            total,
            page: current_page,
            limit,
            total_pages,
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }
}
