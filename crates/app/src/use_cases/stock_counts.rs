//! Stock count (balanço) use cases.

use tracing::info;

use comanda_catalog::ItemId;
use comanda_core::next_sequence_code;
use comanda_stock::{StockCount, StockCountId};

use crate::error::{AppError, AppResult};
use crate::ports::{ItemRepository, StockCountRepository};

const CODE_PREFIX: &str = "BAL-";
const CODE_WIDTH: usize = 3;

/// Starts a new counting session (BAL-001, BAL-002, ...). The session opens
/// empty; the user scans products and then finalizes.
pub fn create_stock_count<R>(counts: &R, name: &str, description: &str) -> AppResult<StockCount>
where
    R: StockCountRepository,
{
    let code = next_sequence_code(
        counts.find_all()?.iter().map(StockCount::code),
        CODE_PREFIX,
        CODE_WIDTH,
    );
    let count = StockCount::start(StockCountId::new(), code, name, description);
    counts.save(&count)?;
    info!(count_id = %count.id_typed(), code = count.code(), "stock count started");
    Ok(count)
}

/// Records a scan (product + counted quantity). Negative quantities are
/// clamped to zero. Returns `None` when the session does not exist or is
/// already finalized.
pub fn add_stock_count_scan<C, I>(
    counts: &C,
    items: &I,
    count_id: StockCountId,
    item_id: ItemId,
    quantity: i64,
) -> AppResult<Option<StockCount>>
where
    C: StockCountRepository,
    I: ItemRepository,
{
    let Some(mut count) = counts.find_by_id(count_id)? else {
        return Ok(None);
    };
    if !count.is_in_progress() {
        return Ok(None);
    }

    if items.find_by_id(item_id)?.is_none() {
        return Err(AppError::Validation(format!(
            "product with id {item_id} not found in catalog"
        )));
    }

    let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
    count.record_scan(item_id, quantity)?;
    counts.save(&count)?;
    Ok(Some(count))
}

/// Finalizes a session, reconciling the scans against current stock.
/// Returns `None` when the session does not exist or is already finalized.
pub fn finalize_stock_count<C, I>(
    counts: &C,
    items: &I,
    count_id: StockCountId,
) -> AppResult<Option<StockCount>>
where
    C: StockCountRepository,
    I: ItemRepository,
{
    let Some(mut count) = counts.find_by_id(count_id)? else {
        return Ok(None);
    };
    if !count.is_in_progress() {
        return Ok(None);
    }

    let system = items
        .find_all()?
        .into_iter()
        .map(|item| (item.id_typed(), item.quantity()));
    count.finalize(system)?;
    counts.save(&count)?;
    info!(count_id = %count.id_typed(), lines = count.lines().len(), "stock count finalized");
    Ok(Some(count))
}

pub fn get_stock_count_by_id<R: StockCountRepository>(
    counts: &R,
    id: StockCountId,
) -> AppResult<Option<StockCount>> {
    Ok(counts.find_by_id(id)?)
}

/// Session history, newest first.
pub fn list_stock_counts<R: StockCountRepository>(counts: &R) -> AppResult<Vec<StockCount>> {
    Ok(counts.find_all()?)
}
