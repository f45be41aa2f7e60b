//! Catalog use cases.

use tracing::info;

use comanda_catalog::{Item, ItemId, generate_gtin13, generate_sku};

use crate::error::{AppError, AppResult};
use crate::ports::{ItemRepository, Page, Pagination, StoreError};

/// The random hex tail makes sku collisions rare; a handful of retries is
/// enough to ride out the unique constraint.
const SKU_SAVE_ATTEMPTS: u32 = 5;
const BARCODE_PROBE_ATTEMPTS: u32 = 10;

#[derive(Debug, Clone)]
pub struct CreateItemInput {
    pub name: String,
    pub price_cents: u64,
    pub cost_price_cents: u64,
    pub supplier_code: String,
    pub description: String,
}

/// Creates a catalog item with a generated sku and internal barcode.
/// Stock starts at zero; quantities only enter through stock entries.
pub fn create_item<R>(items: &R, input: CreateItemInput) -> AppResult<Item>
where
    R: ItemRepository,
{
    let mut last_conflict = String::new();
    for _ in 0..SKU_SAVE_ATTEMPTS {
        let sku = generate_sku(&input.name)?;
        let barcode = unused_barcode(items)?;
        let item = Item::new(
            ItemId::new(),
            &input.name,
            input.price_cents,
            input.cost_price_cents,
            sku,
            &input.supplier_code,
            barcode,
            &input.description,
        )?;

        match items.save(&item) {
            Ok(()) => {
                info!(item_id = %item.id_typed(), sku = item.sku(), "item created");
                return Ok(item);
            }
            Err(StoreError::UniqueViolation(msg)) => last_conflict = msg,
            Err(other) => return Err(other.into()),
        }
    }
    Err(AppError::Conflict(last_conflict))
}

fn unused_barcode<R: ItemRepository>(items: &R) -> AppResult<String> {
    for _ in 0..BARCODE_PROBE_ATTEMPTS {
        let candidate = generate_gtin13();
        if items.find_by_barcode(&candidate)?.is_none() {
            return Ok(candidate);
        }
    }
    Err(AppError::Conflict(
        "could not allocate an unused barcode".to_string(),
    ))
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub price_cents: Option<u64>,
    pub cost_price_cents: Option<u64>,
    pub supplier_code: Option<String>,
    pub description: Option<String>,
}

/// Returns `None` when the item does not exist.
pub fn update_item<R>(items: &R, id: ItemId, input: UpdateItemInput) -> AppResult<Option<Item>>
where
    R: ItemRepository,
{
    let Some(mut item) = items.find_by_id(id)? else {
        return Ok(None);
    };

    if let Some(name) = &input.name {
        item.update_name(name)?;
    }
    if let Some(supplier_code) = &input.supplier_code {
        item.update_supplier_code(supplier_code)?;
    }
    if let Some(price_cents) = input.price_cents {
        item.update_price(price_cents);
    }
    if let Some(cost_price_cents) = input.cost_price_cents {
        item.update_cost_price(cost_price_cents);
    }
    if let Some(description) = &input.description {
        item.update_description(description);
    }

    items.save(&item)?;
    Ok(Some(item))
}

/// Returns `true` when something was actually deleted.
pub fn delete_item<R: ItemRepository>(items: &R, id: ItemId) -> AppResult<bool> {
    let deleted = items.delete(id)?;
    if deleted {
        info!(item_id = %id, "item deleted");
    }
    Ok(deleted)
}

pub fn get_item_by_id<R: ItemRepository>(items: &R, id: ItemId) -> AppResult<Option<Item>> {
    Ok(items.find_by_id(id)?)
}

/// Lists the catalog, optionally filtered by a search term matched against
/// name and barcode (case-insensitive).
pub fn list_items<R>(items: &R, search: Option<&str>, pagination: Pagination) -> AppResult<Page<Item>>
where
    R: ItemRepository,
{
    let all = items.find_all()?;

    let term = search.unwrap_or("").trim().to_lowercase();
    let filtered = if term.is_empty() {
        all
    } else {
        all.into_iter()
            .filter(|item| {
                item.name().to_lowercase().contains(&term)
                    || item.barcode().to_lowercase().contains(&term)
            })
            .collect()
    };

    Ok(Page::paginate(filtered, pagination))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryItemRepository;
    use crate::ports::StoreResult;
    use comanda_catalog::is_valid_gtin13;
    use std::cell::Cell;

    /// Wraps the in-memory store and fails the first N saves with a unique
    /// violation, as if another writer kept winning the sku.
    struct CollidingSaveRepository {
        inner: InMemoryItemRepository,
        failures_left: Cell<u32>,
    }

    impl CollidingSaveRepository {
        fn failing(times: u32) -> Self {
            Self {
                inner: InMemoryItemRepository::new(),
                failures_left: Cell::new(times),
            }
        }
    }

    impl ItemRepository for CollidingSaveRepository {
        fn find_by_id(&self, id: ItemId) -> StoreResult<Option<Item>> {
            self.inner.find_by_id(id)
        }

        fn find_by_barcode(&self, barcode: &str) -> StoreResult<Option<Item>> {
            self.inner.find_by_barcode(barcode)
        }

        fn find_all(&self) -> StoreResult<Vec<Item>> {
            self.inner.find_all()
        }

        fn save(&self, item: &Item) -> StoreResult<()> {
            if self.failures_left.get() > 0 {
                self.failures_left.set(self.failures_left.get() - 1);
                return Err(StoreError::UniqueViolation(
                    "sku already exists".to_string(),
                ));
            }
            self.inner.save(item)
        }

        fn delete(&self, id: ItemId) -> StoreResult<bool> {
            self.inner.delete(id)
        }
    }

    fn input(name: &str) -> CreateItemInput {
        CreateItemInput {
            name: name.to_string(),
            price_cents: 4990,
            cost_price_cents: 2100,
            supplier_code: "F001".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn create_item_generates_sku_and_barcode() {
        let repo = InMemoryItemRepository::new();
        let item = create_item(&repo, input("Brinco Argola Dourado")).unwrap();

        assert!(item.sku().starts_with("BR-"));
        assert!(is_valid_gtin13(item.barcode()));
        assert_eq!(item.quantity(), 0);
        assert!(repo.find_by_id(item.id_typed()).unwrap().is_some());
    }

    #[test]
    fn create_item_rejects_blank_name() {
        let repo = InMemoryItemRepository::new();
        let err = create_item(&repo, input("   ")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn create_item_retries_through_sku_collisions() {
        let repo = CollidingSaveRepository::failing(SKU_SAVE_ATTEMPTS - 1);
        let item = create_item(&repo, input("Brinco Argola")).unwrap();

        assert_eq!(repo.failures_left.get(), 0);
        assert!(repo.inner.find_by_id(item.id_typed()).unwrap().is_some());
    }

    #[test]
    fn create_item_gives_up_after_bounded_collisions() {
        let repo = CollidingSaveRepository::failing(SKU_SAVE_ATTEMPTS);
        let err = create_item(&repo, input("Brinco Argola")).unwrap_err();

        assert!(matches!(err, AppError::Conflict(msg) if msg == "sku already exists"));
        assert!(repo.inner.find_all().unwrap().is_empty());
    }

    #[test]
    fn update_item_applies_only_provided_fields() {
        let repo = InMemoryItemRepository::new();
        let item = create_item(&repo, input("Colar Prata")).unwrap();

        let updated = update_item(
            &repo,
            item.id_typed(),
            UpdateItemInput {
                price_cents: Some(5990),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!(updated.price_cents(), 5990);
        assert_eq!(updated.name(), "Colar Prata");
        assert_eq!(updated.sku(), item.sku());
    }

    #[test]
    fn update_item_returns_none_for_unknown_id() {
        let repo = InMemoryItemRepository::new();
        let result = update_item(&repo, ItemId::new(), UpdateItemInput::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn delete_item_reports_existence() {
        let repo = InMemoryItemRepository::new();
        let item = create_item(&repo, input("Anel Solitário")).unwrap();

        assert!(delete_item(&repo, item.id_typed()).unwrap());
        assert!(!delete_item(&repo, item.id_typed()).unwrap());
    }

    #[test]
    fn list_items_filters_by_name() {
        let repo = InMemoryItemRepository::new();
        create_item(&repo, input("Brinco Argola")).unwrap();
        create_item(&repo, input("Colar Veneziana")).unwrap();

        let page = list_items(&repo, Some("colar"), Pagination::default()).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].name(), "Colar Veneziana");
    }

    #[test]
    fn list_items_filters_by_barcode() {
        let repo = InMemoryItemRepository::new();
        let item = create_item(&repo, input("Brinco Argola")).unwrap();
        create_item(&repo, input("Colar Veneziana")).unwrap();

        let page = list_items(&repo, Some(item.barcode()), Pagination::default()).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].id_typed(), item.id_typed());
    }

    #[test]
    fn list_items_paginates_newest_first() {
        let repo = InMemoryItemRepository::new();
        for i in 0..7 {
            create_item(&repo, input(&format!("Pulseira {i}"))).unwrap();
        }

        let first = list_items(&repo, None, Pagination::default()).unwrap();
        assert_eq!(first.data.len(), 5);
        assert_eq!(first.total, 7);
        assert_eq!(first.total_pages, 2);

        let all = list_items(&repo, None, Pagination::All).unwrap();
        assert_eq!(all.data.len(), 7);
    }
}
