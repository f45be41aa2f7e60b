//! `comanda-catalog` — product catalog: the `Item` entity and the
//! deterministic identifier generators (SKU, GTIN-13 barcode).

pub mod barcode;
pub mod item;
pub mod sku;

pub use barcode::{generate_gtin13, is_valid_gtin13};
pub use item::{Item, ItemId};
pub use sku::generate_sku;
