//! Use cases: one function per operation exposed by the application.
//!
//! Every function takes its repositories explicitly; wiring is the caller's
//! concern (tests inject the in-memory adapters directly).

pub mod items;
pub mod orders;
pub mod stock_counts;
pub mod stock_entries;
pub mod summary;

pub use items::{
    CreateItemInput, UpdateItemInput, create_item, delete_item, get_item_by_id, list_items,
    update_item,
};
pub use orders::{
    OrderFilter, add_item_to_order, create_order, get_order_by_id, list_orders, pay_order,
    remove_item_from_order,
};
pub use stock_counts::{
    add_stock_count_scan, create_stock_count, finalize_stock_count, get_stock_count_by_id,
    list_stock_counts,
};
pub use stock_entries::{
    RegisterStockEntryInput, StockEntryLineInput, UpdateStockEntryInput, get_stock_entry_by_id,
    list_stock_entries, register_stock_entry, update_stock_entry,
};
pub use summary::{OrdersSummary, ProductSold, SalesLine, get_orders_summary};
