use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use comanda_core::{AggregateId, DomainError, DomainResult, Entity, impl_typed_id};

use crate::barcode;

/// Catalog item identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub AggregateId);

impl_typed_id!(ItemId, "ItemId");

/// Entity: catalog product.
///
/// Owns price, cost, SKU, barcode and the on-hand quantity. Stock never goes
/// negative; quantity changes only through [`Item::add_quantity`] and
/// [`Item::deduct_quantity`] (driven by stock entries and paid orders).
/// Prices are integer cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    name: String,
    price_cents: u64,
    cost_price_cents: u64,
    sku: String,
    supplier_code: String,
    barcode: String,
    quantity: u32,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Item {
    /// Creates a new catalog item with zero stock. Stock is only fed through
    /// stock entries, never at creation time.
    pub fn new(
        id: ItemId,
        name: &str,
        price_cents: u64,
        cost_price_cents: u64,
        sku: String,
        supplier_code: &str,
        barcode: String,
        description: &str,
    ) -> DomainResult<Self> {
        let name = Self::validated_name(name)?;
        let supplier_code = Self::validated_supplier_code(supplier_code)?;
        if sku.trim().is_empty() {
            return Err(DomainError::validation("sku cannot be empty"));
        }
        if !barcode::is_valid_gtin13(&barcode) {
            return Err(DomainError::validation(format!(
                "barcode \"{barcode}\" is not a valid GTIN-13"
            )));
        }
        let now = Utc::now();
        Ok(Self {
            id,
            name,
            price_cents,
            cost_price_cents,
            sku,
            supplier_code,
            barcode,
            quantity: 0,
            description: description.trim().to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price_cents(&self) -> u64 {
        self.price_cents
    }

    pub fn cost_price_cents(&self) -> u64 {
        self.cost_price_cents
    }

    /// Immutable after creation; uniqueness is enforced at the store.
    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn supplier_code(&self) -> &str {
        &self.supplier_code
    }

    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    /// On-hand quantity. Never negative.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn update_name(&mut self, name: &str) -> DomainResult<()> {
        self.name = Self::validated_name(name)?;
        self.touch();
        Ok(())
    }

    pub fn update_supplier_code(&mut self, supplier_code: &str) -> DomainResult<()> {
        self.supplier_code = Self::validated_supplier_code(supplier_code)?;
        self.touch();
        Ok(())
    }

    pub fn update_price(&mut self, price_cents: u64) {
        self.price_cents = price_cents;
        self.touch();
    }

    pub fn update_cost_price(&mut self, cost_price_cents: u64) {
        self.cost_price_cents = cost_price_cents;
        self.touch();
    }

    pub fn update_description(&mut self, description: &str) {
        self.description = description.trim().to_string();
        self.touch();
    }

    /// Adds received stock. `quantity` must be positive.
    pub fn add_quantity(&mut self, quantity: u32) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation(
                "quantity to add must be a positive integer",
            ));
        }
        self.quantity += quantity;
        self.touch();
        Ok(())
    }

    /// Deducts sold/reversed stock. Fails rather than let the on-hand
    /// quantity go negative.
    pub fn deduct_quantity(&mut self, quantity: u32) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation(
                "quantity to deduct must be a positive integer",
            ));
        }
        if quantity > self.quantity {
            return Err(DomainError::invariant(format!(
                "insufficient stock for \"{}\": available {}, requested {}",
                self.name, self.quantity, quantity
            )));
        }
        self.quantity -= quantity;
        self.touch();
        Ok(())
    }

    fn validated_name(name: &str) -> DomainResult<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        Ok(trimmed.to_string())
    }

    fn validated_supplier_code(supplier_code: &str) -> DomainResult<String> {
        let trimmed = supplier_code.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("supplier code cannot be empty"));
        }
        Ok(trimmed.to_string())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> ItemId {
        self.id
    }
}
