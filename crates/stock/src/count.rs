use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use comanda_catalog::ItemId;
use comanda_core::{AggregateId, DomainError, DomainResult, Entity, ValueObject, impl_typed_id};

/// Stock count (physical inventory session) identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockCountId(pub AggregateId);

impl_typed_id!(StockCountId, "StockCountId");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockCountStatus {
    InProgress,
    Finalized,
}

/// Value object: one counted item.
///
/// `system_quantity` and `variance` are only populated at finalization;
/// while the session is in progress a line is just item + counted quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockCountLine {
    item_id: ItemId,
    counted_quantity: u32,
    system_quantity: Option<u32>,
    variance: Option<i64>,
}

impl StockCountLine {
    /// Line for an in-progress session (no reconciliation data yet).
    pub fn scanned(item_id: ItemId, counted_quantity: u32) -> Self {
        Self {
            item_id,
            counted_quantity,
            system_quantity: None,
            variance: None,
        }
    }

    /// Reconciled line: variance = counted - system (positive = surplus,
    /// negative = shortage).
    pub fn reconciled(item_id: ItemId, counted_quantity: u32, system_quantity: u32) -> Self {
        Self {
            item_id,
            counted_quantity,
            system_quantity: Some(system_quantity),
            variance: Some(i64::from(counted_quantity) - i64::from(system_quantity)),
        }
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn counted_quantity(&self) -> u32 {
        self.counted_quantity
    }

    pub fn system_quantity(&self) -> Option<u32> {
        self.system_quantity
    }

    pub fn variance(&self) -> Option<i64> {
        self.variance
    }
}

impl ValueObject for StockCountLine {}

/// Aggregate: stock count session.
///
/// The user scans products with a collector while the session is
/// IN_PROGRESS; finalization reconciles the scans against the system
/// quantities and freezes the line set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockCount {
    id: StockCountId,
    /// Display code (e.g. BAL-001), generated sequentially.
    code: String,
    name: String,
    description: String,
    status: StockCountStatus,
    lines: Vec<StockCountLine>,
    created_at: DateTime<Utc>,
    finalized_at: Option<DateTime<Utc>>,
}

impl StockCount {
    /// Starts an empty counting session.
    pub fn start(id: StockCountId, code: String, name: &str, description: &str) -> Self {
        Self {
            id,
            code,
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            status: StockCountStatus::InProgress,
            lines: Vec::new(),
            created_at: Utc::now(),
            finalized_at: None,
        }
    }

    pub fn id_typed(&self) -> StockCountId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> StockCountStatus {
        self.status
    }

    pub fn lines(&self) -> &[StockCountLine] {
        &self.lines
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn finalized_at(&self) -> Option<DateTime<Utc>> {
        self.finalized_at
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == StockCountStatus::InProgress
    }

    /// Records a scan. Scanning an item twice sums the counted quantities.
    pub fn record_scan(&mut self, item_id: ItemId, quantity: u32) -> DomainResult<()> {
        self.ensure_in_progress()?;
        match self.lines.iter_mut().find(|l| l.item_id == item_id) {
            Some(line) => line.counted_quantity += quantity,
            None => self.lines.push(StockCountLine::scanned(item_id, quantity)),
        }
        Ok(())
    }

    /// Finalizes the session against a snapshot of the catalog
    /// (`(item_id, on-hand quantity)` pairs).
    ///
    /// Every catalog item gets a line — counted 0 if it was never scanned —
    /// and scans for items no longer in the catalog are kept as pure surplus
    /// (system quantity 0). Lines are sorted by item id so the report is
    /// deterministic. After this the line set is frozen.
    pub fn finalize<I>(&mut self, system_quantities: I) -> DomainResult<()>
    where
        I: IntoIterator<Item = (ItemId, u32)>,
    {
        self.ensure_in_progress()?;

        let mut counted_by_item: std::collections::HashMap<ItemId, u32> = self
            .lines
            .iter()
            .map(|l| (l.item_id, l.counted_quantity))
            .collect();

        let mut reconciled = Vec::new();
        for (item_id, system_quantity) in system_quantities {
            let counted = counted_by_item.remove(&item_id).unwrap_or(0);
            reconciled.push(StockCountLine::reconciled(item_id, counted, system_quantity));
        }

        // Scanned but unknown to the catalog (e.g. deleted product).
        for (item_id, counted) in counted_by_item {
            reconciled.push(StockCountLine::reconciled(item_id, counted, 0));
        }

        reconciled.sort_by_key(StockCountLine::item_id);

        self.lines = reconciled;
        self.status = StockCountStatus::Finalized;
        self.finalized_at = Some(Utc::now());
        Ok(())
    }

    fn ensure_in_progress(&self) -> DomainResult<()> {
        if self.status != StockCountStatus::InProgress {
            return Err(DomainError::invariant(
                "stock count is already finalized",
            ));
        }
        Ok(())
    }
}

impl Entity for StockCount {
    type Id = StockCountId;

    fn id(&self) -> StockCountId {
        self.id
    }
}
