use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use comanda_catalog::ItemId;
use comanda_core::{AggregateId, DomainError, DomainResult, Entity, ValueObject, impl_typed_id};

/// Stock entry (inbound movement document) identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockEntryId(pub AggregateId);

impl_typed_id!(StockEntryId, "StockEntryId");

/// Value object: one received item + quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntryLine {
    item_id: ItemId,
    quantity: u32,
}

impl StockEntryLine {
    pub fn new(item_id: ItemId, quantity: u32) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation(
                "stock entry quantity must be a positive integer",
            ));
        }
        Ok(Self { item_id, quantity })
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

impl ValueObject for StockEntryLine {}

/// Aggregate: inbound stock document (invoice, purchase order, ...).
///
/// Registering an entry adds its quantities to the items' stock; that side
/// effect belongs to the orchestrator, the document only records what came in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    id: StockEntryId,
    /// External reference (invoice/purchase-order number), if any.
    reference: Option<String>,
    supplier: Option<String>,
    lines: Vec<StockEntryLine>,
    created_at: DateTime<Utc>,
}

impl StockEntry {
    pub fn new(
        id: StockEntryId,
        reference: Option<&str>,
        supplier: Option<&str>,
        lines: Vec<StockEntryLine>,
    ) -> DomainResult<Self> {
        if lines.is_empty() {
            return Err(DomainError::validation(
                "a stock entry needs at least one line",
            ));
        }
        Ok(Self {
            id,
            reference: normalized(reference),
            supplier: normalized(supplier),
            lines,
            created_at: Utc::now(),
        })
    }

    pub fn id_typed(&self) -> StockEntryId {
        self.id
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn supplier(&self) -> Option<&str> {
        self.supplier.as_deref()
    }

    pub fn lines(&self) -> &[StockEntryLine] {
        &self.lines
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn update_reference(&mut self, reference: Option<&str>) {
        self.reference = normalized(reference);
    }

    pub fn update_supplier(&mut self, supplier: Option<&str>) {
        self.supplier = normalized(supplier);
    }

    /// Replaces the whole line set. The caller is responsible for reversing
    /// the old quantities on the affected items first.
    pub fn replace_lines(&mut self, lines: Vec<StockEntryLine>) -> DomainResult<()> {
        if lines.is_empty() {
            return Err(DomainError::validation(
                "a stock entry needs at least one line",
            ));
        }
        self.lines = lines;
        Ok(())
    }
}

impl Entity for StockEntry {
    type Id = StockEntryId;

    fn id(&self) -> StockEntryId {
        self.id
    }
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
