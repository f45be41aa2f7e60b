//! In-memory adapters for the repository ports.
//!
//! Intended for tests/dev. Not optimized for performance.

use std::collections::HashMap;
use std::sync::RwLock;

use comanda_catalog::{Item, ItemId};
use comanda_core::next_sequence_code;
use comanda_sales::{Order, OrderId};
use comanda_stock::{StockCount, StockCountId, StockEntry, StockEntryId};

use crate::ports::{
    ItemRepository, OrderRepository, StockCountRepository, StockEntryRepository, StoreError,
    StoreResult,
};

const COM_NUMBER_PREFIX: &str = "COM-";
const COM_NUMBER_WIDTH: usize = 4;

fn poisoned() -> StoreError {
    StoreError::Storage("lock poisoned".to_string())
}

/// Catalog store enforcing the sku and barcode unique constraints.
#[derive(Debug, Default)]
pub struct InMemoryItemRepository {
    items: RwLock<HashMap<ItemId, Item>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ItemRepository for InMemoryItemRepository {
    fn find_by_id(&self, id: ItemId) -> StoreResult<Option<Item>> {
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items.get(&id).cloned())
    }

    fn find_by_barcode(&self, barcode: &str) -> StoreResult<Option<Item>> {
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items.values().find(|i| i.barcode() == barcode).cloned())
    }

    fn find_all(&self) -> StoreResult<Vec<Item>> {
        let items = self.items.read().map_err(|_| poisoned())?;
        let mut all: Vec<Item> = items.values().cloned().collect();
        // Newest first, like the listings.
        all.sort_by_key(|i| (i.created_at(), i.id_typed()));
        all.reverse();
        Ok(all)
    }

    fn save(&self, item: &Item) -> StoreResult<()> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        for existing in items.values() {
            if existing.id_typed() == item.id_typed() {
                continue;
            }
            if existing.sku() == item.sku() {
                return Err(StoreError::UniqueViolation(format!(
                    "sku \"{}\" already exists",
                    item.sku()
                )));
            }
            if existing.barcode() == item.barcode() {
                return Err(StoreError::UniqueViolation(format!(
                    "barcode \"{}\" already exists",
                    item.barcode()
                )));
            }
        }
        items.insert(item.id_typed(), item.clone());
        Ok(())
    }

    fn delete(&self, id: ItemId) -> StoreResult<bool> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        Ok(items.remove(&id).is_some())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn find_by_id(&self, id: OrderId) -> StoreResult<Option<Order>> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        Ok(orders.get(&id).cloned())
    }

    fn find_all(&self) -> StoreResult<Vec<Order>> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        let mut all: Vec<Order> = orders.values().cloned().collect();
        all.sort_by_key(|o| (o.created_at(), o.id_typed()));
        all.reverse();
        Ok(all)
    }

    fn save(&self, order: &Order) -> StoreResult<()> {
        let mut orders = self.orders.write().map_err(|_| poisoned())?;
        orders.insert(order.id_typed(), order.clone());
        Ok(())
    }

    fn delete(&self, id: OrderId) -> StoreResult<bool> {
        let mut orders = self.orders.write().map_err(|_| poisoned())?;
        Ok(orders.remove(&id).is_some())
    }

    fn next_com_number(&self) -> StoreResult<String> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        Ok(next_sequence_code(
            orders.values().map(|o| o.com_number()),
            COM_NUMBER_PREFIX,
            COM_NUMBER_WIDTH,
        ))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStockEntryRepository {
    entries: RwLock<HashMap<StockEntryId, StockEntry>>,
}

impl InMemoryStockEntryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StockEntryRepository for InMemoryStockEntryRepository {
    fn find_by_id(&self, id: StockEntryId) -> StoreResult<Option<StockEntry>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(&id).cloned())
    }

    fn find_all(&self) -> StoreResult<Vec<StockEntry>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        let mut all: Vec<StockEntry> = entries.values().cloned().collect();
        all.sort_by_key(|e| (e.created_at(), e.id_typed()));
        all.reverse();
        Ok(all)
    }

    fn save(&self, entry: &StockEntry) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(entry.id_typed(), entry.clone());
        Ok(())
    }

    fn delete(&self, id: StockEntryId) -> StoreResult<bool> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        Ok(entries.remove(&id).is_some())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStockCountRepository {
    counts: RwLock<HashMap<StockCountId, StockCount>>,
}

impl InMemoryStockCountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StockCountRepository for InMemoryStockCountRepository {
    fn find_by_id(&self, id: StockCountId) -> StoreResult<Option<StockCount>> {
        let counts = self.counts.read().map_err(|_| poisoned())?;
        Ok(counts.get(&id).cloned())
    }

    fn find_all(&self) -> StoreResult<Vec<StockCount>> {
        let counts = self.counts.read().map_err(|_| poisoned())?;
        let mut all: Vec<StockCount> = counts.values().cloned().collect();
        all.sort_by_key(|c| (c.created_at(), c.id_typed()));
        all.reverse();
        Ok(all)
    }

    fn save(&self, count: &StockCount) -> StoreResult<()> {
        let mut counts = self.counts.write().map_err(|_| poisoned())?;
        counts.insert(count.id_typed(), count.clone());
        Ok(())
    }

    fn delete(&self, id: StockCountId) -> StoreResult<bool> {
        let mut counts = self.counts.write().map_err(|_| poisoned())?;
        Ok(counts.remove(&id).is_some())
    }
}
