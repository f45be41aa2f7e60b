//! End-to-end flow over the in-memory adapters: catalog, inbound stock,
//! comanda lifecycle, daily summary and a stock count reconciliation.

use comanda_app::ItemRepository;
use comanda_app::memory::{
    InMemoryItemRepository, InMemoryOrderRepository, InMemoryStockCountRepository,
    InMemoryStockEntryRepository,
};
use comanda_app::use_cases::{
    CreateItemInput, OrderFilter, RegisterStockEntryInput, StockEntryLineInput,
    add_item_to_order, add_stock_count_scan, create_item, create_order, create_stock_count,
    finalize_stock_count, get_orders_summary, list_orders, list_stock_entries, pay_order,
    register_stock_entry, remove_item_from_order,
};
use comanda_app::{AppError, Pagination};
use comanda_sales::{OrderStatus, PaymentMethod};
use comanda_stock::StockCountStatus;

#[test]
fn full_point_of_sale_flow() {
    comanda_observability::init();

    let items = InMemoryItemRepository::new();
    let orders = InMemoryOrderRepository::new();
    let entries = InMemoryStockEntryRepository::new();
    let counts = InMemoryStockCountRepository::new();

    // Catalog: two products, stock starts at zero.
    let brinco = create_item(
        &items,
        CreateItemInput {
            name: "Brinco Argola Dourado".to_string(),
            price_cents: 4990,
            cost_price_cents: 2100,
            supplier_code: "F001".to_string(),
            description: "Argola média".to_string(),
        },
    )
    .unwrap();
    let colar = create_item(
        &items,
        CreateItemInput {
            name: "Colar Veneziana Ródio".to_string(),
            price_cents: 8990,
            cost_price_cents: 4000,
            supplier_code: "F002".to_string(),
            description: String::new(),
        },
    )
    .unwrap();
    assert_eq!(brinco.quantity(), 0);

    // Inbound stock document feeds the quantities.
    register_stock_entry(
        &entries,
        &items,
        RegisterStockEntryInput {
            reference: Some("NF-1001".to_string()),
            supplier: Some("Fornecedor A".to_string()),
            lines: vec![
                StockEntryLineInput {
                    barcode: Some(brinco.barcode().to_string()),
                    item_id: None,
                    quantity: 10,
                },
                StockEntryLineInput {
                    barcode: None,
                    item_id: Some(colar.id_typed()),
                    quantity: 4,
                },
            ],
        },
    )
    .unwrap();
    assert_eq!(list_stock_entries(&entries).unwrap().len(), 1);

    // Open a comanda, sell 2 brincos and 1 colar, then drop the colar.
    let order = create_order(&orders, Some("Maria")).unwrap();
    assert_eq!(order.com_number(), "COM-0001");

    add_item_to_order(&orders, &items, order.id_typed(), brinco.id_typed(), 2)
        .unwrap()
        .unwrap();
    add_item_to_order(&orders, &items, order.id_typed(), colar.id_typed(), 1)
        .unwrap()
        .unwrap();
    let order = remove_item_from_order(&orders, order.id_typed(), colar.id_typed())
        .unwrap()
        .unwrap();
    assert_eq!(order.total_cents(), 2 * 4990);

    // Close the comanda; stock is deducted.
    let paid = pay_order(&orders, &items, order.id_typed(), PaymentMethod::CreditCard)
        .unwrap()
        .unwrap();
    assert_eq!(paid.status(), OrderStatus::Paid);
    assert_eq!(
        items.find_by_id(brinco.id_typed()).unwrap().unwrap().quantity(),
        8,
        "paying must deduct the sold quantity"
    );

    // A paid comanda can no longer be edited.
    let err = remove_item_from_order(&orders, paid.id_typed(), brinco.id_typed()).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Daily summary sees exactly this sale.
    let date = paid.created_at().date_naive();
    let summary = get_orders_summary(&orders, date).unwrap();
    assert_eq!(summary.total_orders, 1);
    assert_eq!(summary.total_cents, 9980);
    assert_eq!(summary.com_numbers, vec!["COM-0001"]);
    assert_eq!(summary.products_sold.len(), 1);
    assert_eq!(summary.products_sold[0].quantity_sold, 2);

    let paid_page = list_orders(
        &orders,
        OrderFilter {
            status: Some(OrderStatus::Paid),
            ..Default::default()
        },
        Pagination::default(),
    )
    .unwrap();
    assert_eq!(paid_page.total, 1);

    // Stock count: scan fewer brincos than the system expects.
    let count = create_stock_count(&counts, "Balanço semanal", "").unwrap();
    assert_eq!(count.code(), "BAL-001");
    add_stock_count_scan(&counts, &items, count.id_typed(), brinco.id_typed(), 5).unwrap();
    add_stock_count_scan(&counts, &items, count.id_typed(), brinco.id_typed(), 2).unwrap();

    let finalized = finalize_stock_count(&counts, &items, count.id_typed())
        .unwrap()
        .unwrap();
    assert_eq!(finalized.status(), StockCountStatus::Finalized);
    assert_eq!(finalized.lines().len(), 2, "every catalog item gets a line");

    let brinco_line = finalized
        .lines()
        .iter()
        .find(|l| l.item_id() == brinco.id_typed())
        .unwrap();
    assert_eq!(brinco_line.counted_quantity(), 7);
    assert_eq!(brinco_line.system_quantity(), Some(8));
    assert_eq!(brinco_line.variance(), Some(-1));

    let colar_line = finalized
        .lines()
        .iter()
        .find(|l| l.item_id() == colar.id_typed())
        .unwrap();
    assert_eq!(colar_line.counted_quantity(), 0);
    assert_eq!(colar_line.variance(), Some(-4));
}
