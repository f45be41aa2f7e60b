//! Stock entry use cases: the only flow that feeds quantities into the catalog.

use tracing::info;

use comanda_catalog::{Item, ItemId};
use comanda_stock::{StockEntry, StockEntryId, StockEntryLine};

use crate::error::{AppError, AppResult};
use crate::ports::{ItemRepository, StockEntryRepository};

/// One requested line: the product is addressed by barcode (preferred,
/// that is what the collector scans) or by item id.
#[derive(Debug, Clone)]
pub struct StockEntryLineInput {
    pub barcode: Option<String>,
    pub item_id: Option<ItemId>,
    pub quantity: u32,
}

#[derive(Debug, Clone)]
pub struct RegisterStockEntryInput {
    pub reference: Option<String>,
    pub supplier: Option<String>,
    pub lines: Vec<StockEntryLineInput>,
}

/// Registers an inbound stock document and adds its quantities to the items.
///
/// Every line is resolved and validated before any stock is touched.
pub fn register_stock_entry<E, I>(
    entries: &E,
    items: &I,
    input: RegisterStockEntryInput,
) -> AppResult<StockEntry>
where
    E: StockEntryRepository,
    I: ItemRepository,
{
    if input.lines.is_empty() {
        return Err(AppError::Validation(
            "a stock entry needs at least one line (barcode or item id plus quantity)".to_string(),
        ));
    }

    let resolved = resolve_lines(items, &input.lines)?;
    let entry_lines = apply_entry(items, resolved)?;

    let entry = StockEntry::new(
        StockEntryId::new(),
        input.reference.as_deref(),
        input.supplier.as_deref(),
        entry_lines,
    )?;
    entries.save(&entry)?;
    info!(entry_id = %entry.id_typed(), lines = entry.lines().len(), "stock entry registered");
    Ok(entry)
}

/// Partial update of a stock entry.
///
/// When `lines` is present and non-empty the old quantities are reversed on
/// the affected items and the new lines applied in their place. Reference and
/// supplier are updated independently; an empty string clears the field.
#[derive(Debug, Clone, Default)]
pub struct UpdateStockEntryInput {
    pub reference: Option<String>,
    pub supplier: Option<String>,
    pub lines: Option<Vec<StockEntryLineInput>>,
}

/// Returns `None` when the entry does not exist.
pub fn update_stock_entry<E, I>(
    entries: &E,
    items: &I,
    id: StockEntryId,
    input: UpdateStockEntryInput,
) -> AppResult<Option<StockEntry>>
where
    E: StockEntryRepository,
    I: ItemRepository,
{
    let Some(mut entry) = entries.find_by_id(id)? else {
        return Ok(None);
    };

    let new_lines = input.lines.filter(|lines| !lines.is_empty());
    if let Some(lines) = new_lines {
        // Reverse before resolving: an item present in both the old and the
        // new lines must be re-read after its quantity was backed out.
        reverse_entry(items, entry.lines())?;
        let resolved = resolve_lines(items, &lines)?;
        let entry_lines = apply_entry(items, resolved)?;
        entry.replace_lines(entry_lines)?;
    }

    if let Some(reference) = &input.reference {
        entry.update_reference(Some(reference));
    }
    if let Some(supplier) = &input.supplier {
        entry.update_supplier(Some(supplier));
    }

    entries.save(&entry)?;
    info!(entry_id = %entry.id_typed(), "stock entry updated");
    Ok(Some(entry))
}

pub fn get_stock_entry_by_id<E: StockEntryRepository>(
    entries: &E,
    id: StockEntryId,
) -> AppResult<Option<StockEntry>> {
    Ok(entries.find_by_id(id)?)
}

/// History of inbound documents, newest first.
pub fn list_stock_entries<E: StockEntryRepository>(entries: &E) -> AppResult<Vec<StockEntry>> {
    Ok(entries.find_all()?)
}

fn resolve_lines<I: ItemRepository>(
    items: &I,
    lines: &[StockEntryLineInput],
) -> AppResult<Vec<(Item, StockEntryLine)>> {
    let mut resolved = Vec::with_capacity(lines.len());
    for line in lines {
        let barcode = line.barcode.as_deref().unwrap_or("").trim();

        let item = if !barcode.is_empty() {
            items.find_by_barcode(barcode)?.ok_or_else(|| {
                AppError::Validation(format!(
                    "product with barcode \"{barcode}\" not found in catalog"
                ))
            })?
        } else if let Some(item_id) = line.item_id {
            items.find_by_id(item_id)?.ok_or_else(|| {
                AppError::Validation(format!("product with id {item_id} not found in catalog"))
            })?
        } else {
            return Err(AppError::Validation(
                "each stock entry line needs a barcode or an item id".to_string(),
            ));
        };

        let entry_line = StockEntryLine::new(item.id_typed(), line.quantity)?;
        resolved.push((item, entry_line));
    }
    Ok(resolved)
}

fn apply_entry<I: ItemRepository>(
    items: &I,
    resolved: Vec<(Item, StockEntryLine)>,
) -> AppResult<Vec<StockEntryLine>> {
    let mut entry_lines = Vec::with_capacity(resolved.len());
    for (mut item, line) in resolved {
        item.add_quantity(line.quantity())?;
        items.save(&item)?;
        entry_lines.push(line);
    }
    Ok(entry_lines)
}

/// Deducts an entry's quantities back out of the items (used before
/// replacing the lines of an existing entry).
fn reverse_entry<I: ItemRepository>(items: &I, lines: &[StockEntryLine]) -> AppResult<()> {
    for line in lines {
        let Some(mut item) = items.find_by_id(line.item_id())? else {
            return Err(AppError::Validation(format!(
                "product with id {} not found; cannot reverse the entry",
                line.item_id()
            )));
        };
        item.deduct_quantity(line.quantity()).map_err(|err| {
            AppError::Validation(format!(
                "insufficient stock to reverse the entry for product {}: {err}",
                line.item_id()
            ))
        })?;
        items.save(&item)?;
    }
    Ok(())
}
