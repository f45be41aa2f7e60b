//! `comanda-sales` — the `Order` aggregate (comanda) and its line items.

pub mod order;

pub use order::{Order, OrderId, OrderLine, OrderStatus, PaymentMethod};
