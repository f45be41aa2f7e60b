use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use comanda_catalog::ItemId;
use comanda_core::{AggregateId, DomainError, DomainResult, Entity, ValueObject, impl_typed_id};

/// Sales order (comanda) identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub AggregateId);

impl_typed_id!(OrderId, "OrderId");

/// Order status lifecycle: OPEN -> PAID -> REFUNDED, or OPEN -> CANCELLED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Open,
    Paid,
    Cancelled,
    Refunded,
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            OrderStatus::Open => "OPEN",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Refunded => "REFUNDED",
        };
        f.write_str(s)
    }
}

/// Payment method recorded when the comanda is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Pix,
    Money,
    CreditCard,
    DebitCard,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Pix,
        PaymentMethod::Money,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
    ];
}

/// Value object: one order line.
///
/// References the catalog item by id only; unit price and product name are
/// snapshotted at add-time for historical accuracy (a later price change must
/// not rewrite closed comandas).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    item_id: ItemId,
    quantity: u32,
    unit_price_cents: u64,
    product_name: String,
}

impl OrderLine {
    pub fn new(
        item_id: ItemId,
        quantity: u32,
        unit_price_cents: u64,
        product_name: &str,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation(
                "line quantity must be a positive integer",
            ));
        }
        Ok(Self {
            item_id,
            quantity,
            unit_price_cents,
            product_name: product_name.trim().to_string(),
        })
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price_cents(&self) -> u64 {
        self.unit_price_cents
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Line subtotal (quantity x unit price), in cents.
    pub fn subtotal_cents(&self) -> u64 {
        u64::from(self.quantity) * self.unit_price_cents
    }
}

impl ValueObject for OrderLine {}

/// Aggregate root: sales order (comanda).
///
/// Accumulates lines while OPEN; `total` is re-derived from the lines after
/// every mutation so it is always consistent on the write side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    status: OrderStatus,
    total_cents: u64,
    /// Human-readable comanda code (e.g. COM-0001).
    com_number: String,
    client: Option<String>,
    payment_method: Option<PaymentMethod>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    lines: Vec<OrderLine>,
}

impl Order {
    /// Opens a fresh, empty comanda.
    pub fn open(id: OrderId, com_number: String, client: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: OrderStatus::Open,
            total_cents: 0,
            com_number,
            client: client.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
            payment_method: None,
            created_at: now,
            updated_at: now,
            lines: Vec::new(),
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn total_cents(&self) -> u64 {
        self.total_cents
    }

    pub fn com_number(&self) -> &str {
        &self.com_number
    }

    pub fn client(&self) -> Option<&str> {
        self.client.as_deref()
    }

    /// Set when the comanda is paid; `None` while open or cancelled.
    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }

    /// Adds a line, merging with an existing line for the same item: the
    /// quantities are summed, the freshly supplied unit price wins, and the
    /// previous product name is kept when the new one is empty.
    pub fn add_line(&mut self, line: OrderLine) -> DomainResult<()> {
        self.ensure_open()?;
        match self.lines.iter_mut().find(|l| l.item_id == line.item_id) {
            Some(existing) => {
                existing.quantity += line.quantity;
                existing.unit_price_cents = line.unit_price_cents;
                if !line.product_name.is_empty() {
                    existing.product_name = line.product_name;
                }
            }
            None => self.lines.push(line),
        }
        self.recalculate_total_and_touch();
        Ok(())
    }

    /// Removes the first line matching `item_id`.
    pub fn remove_line(&mut self, item_id: ItemId) -> DomainResult<()> {
        self.ensure_open()?;
        let index = self
            .lines
            .iter()
            .position(|l| l.item_id == item_id)
            .ok_or_else(DomainError::not_found)?;
        self.lines.remove(index);
        self.recalculate_total_and_touch();
        Ok(())
    }

    /// Replaces the quantity of the line matching `item_id`.
    pub fn update_line_quantity(&mut self, item_id: ItemId, quantity: u32) -> DomainResult<()> {
        self.ensure_open()?;
        if quantity == 0 {
            return Err(DomainError::validation(
                "line quantity must be a positive integer",
            ));
        }
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.item_id == item_id)
            .ok_or_else(DomainError::not_found)?;
        line.quantity = quantity;
        self.recalculate_total_and_touch();
        Ok(())
    }

    /// Closes the comanda. Stock deduction is the orchestrator's job; the
    /// aggregate only guards the status transition.
    pub fn pay(&mut self, payment_method: PaymentMethod) -> DomainResult<()> {
        if self.status != OrderStatus::Open {
            return Err(DomainError::invariant(format!(
                "order cannot be paid, current status: {}",
                self.status
            )));
        }
        self.payment_method = Some(payment_method);
        self.status = OrderStatus::Paid;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn cancel(&mut self) -> DomainResult<()> {
        if matches!(self.status, OrderStatus::Paid | OrderStatus::Refunded) {
            return Err(DomainError::invariant(format!(
                "order cannot be cancelled, current status: {}",
                self.status
            )));
        }
        self.status = OrderStatus::Cancelled;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn refund(&mut self) -> DomainResult<()> {
        if self.status != OrderStatus::Paid {
            return Err(DomainError::invariant(format!(
                "only paid orders can be refunded, current status: {}",
                self.status
            )));
        }
        self.status = OrderStatus::Refunded;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn ensure_open(&self) -> DomainResult<()> {
        if self.status != OrderStatus::Open {
            return Err(DomainError::invariant(format!(
                "order is not open, current status: {}",
                self.status
            )));
        }
        Ok(())
    }

    fn recalculate_total_and_touch(&mut self) {
        self.total_cents = self.lines.iter().map(OrderLine::subtotal_cents).sum();
        self.updated_at = Utc::now();
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> OrderId {
        self.id
    }
}
