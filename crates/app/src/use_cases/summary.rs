//! Daily sales summary over paid comandas.

use chrono::NaiveDate;

use comanda_catalog::ItemId;
use comanda_sales::{OrderStatus, PaymentMethod};

use crate::error::AppResult;
use crate::ports::OrderRepository;

/// Sales of one product over the day, aggregated across comandas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSold {
    pub item_id: ItemId,
    pub product_name: String,
    pub quantity_sold: u64,
    pub total_cents: u64,
}

/// One sold line with the comanda it belongs to (report detail rows).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesLine {
    pub com_number: String,
    pub product_name: String,
    pub quantity_sold: u32,
    pub total_cents: u64,
}

/// Day summary over paid comandas only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdersSummary {
    pub date: NaiveDate,
    pub total_orders: usize,
    pub total_cents: u64,
    /// One entry per payment method, zero for methods without sales.
    pub totals_by_payment_method: Vec<(PaymentMethod, u64)>,
    pub com_numbers: Vec<String>,
    pub products_sold: Vec<ProductSold>,
    pub sales_lines: Vec<SalesLine>,
}

/// Summarizes the paid comandas of a UTC calendar day.
pub fn get_orders_summary<R: OrderRepository>(
    orders: &R,
    date: NaiveDate,
) -> AppResult<OrdersSummary> {
    let mut of_day: Vec<_> = orders
        .find_all()?
        .into_iter()
        .filter(|o| o.status() == OrderStatus::Paid && o.created_at().date_naive() == date)
        .collect();
    // Report rows read oldest first.
    of_day.reverse();

    let total_orders = of_day.len();
    let total_cents = of_day.iter().map(|o| o.total_cents()).sum();
    let com_numbers = of_day.iter().map(|o| o.com_number().to_string()).collect();

    let mut totals_by_payment_method: Vec<(PaymentMethod, u64)> =
        PaymentMethod::ALL.iter().map(|&m| (m, 0)).collect();
    for order in &of_day {
        if let Some(method) = order.payment_method() {
            if let Some(entry) = totals_by_payment_method.iter_mut().find(|(m, _)| *m == method)
            {
                entry.1 += order.total_cents();
            }
        }
    }

    let mut products_sold: Vec<ProductSold> = Vec::new();
    for order in &of_day {
        for line in order.lines() {
            match products_sold
                .iter_mut()
                .find(|p| p.item_id == line.item_id())
            {
                Some(product) => {
                    product.quantity_sold += u64::from(line.quantity());
                    product.total_cents += line.subtotal_cents();
                    if product.product_name.is_empty() && !line.product_name().is_empty() {
                        product.product_name = line.product_name().to_string();
                    }
                }
                None => products_sold.push(ProductSold {
                    item_id: line.item_id(),
                    product_name: line.product_name().to_string(),
                    quantity_sold: u64::from(line.quantity()),
                    total_cents: line.subtotal_cents(),
                }),
            }
        }
    }

    let mut sales_lines = Vec::new();
    for order in &of_day {
        for line in order.lines() {
            sales_lines.push(SalesLine {
                com_number: order.com_number().to_string(),
                product_name: line.product_name().to_string(),
                quantity_sold: line.quantity(),
                total_cents: line.subtotal_cents(),
            });
        }
    }

    Ok(OrdersSummary {
        date,
        total_orders,
        total_cents,
        totals_by_payment_method,
        com_numbers,
        products_sold,
        sales_lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{
        InMemoryItemRepository, InMemoryOrderRepository, InMemoryStockEntryRepository,
    };
    use crate::use_cases::items::{CreateItemInput, create_item};
    use crate::use_cases::orders::{add_item_to_order, create_order, pay_order};
    use crate::use_cases::stock_entries::{
        RegisterStockEntryInput, StockEntryLineInput, register_stock_entry,
    };
    use comanda_catalog::Item;

    fn stocked_item(items: &InMemoryItemRepository, name: &str, price: u64, qty: u32) -> Item {
        let item = create_item(
            items,
            CreateItemInput {
                name: name.to_string(),
                price_cents: price,
                cost_price_cents: price / 2,
                supplier_code: "F001".to_string(),
                description: String::new(),
            },
        )
        .unwrap();
        let entries = InMemoryStockEntryRepository::new();
        register_stock_entry(
            &entries,
            items,
            RegisterStockEntryInput {
                reference: None,
                supplier: None,
                lines: vec![StockEntryLineInput {
                    barcode: None,
                    item_id: Some(item.id_typed()),
                    quantity: qty,
                }],
            },
        )
        .unwrap();
        item
    }

    #[test]
    fn summary_counts_only_paid_orders_of_the_day() {
        let orders = InMemoryOrderRepository::new();
        let items = InMemoryItemRepository::new();
        let brinco = stocked_item(&items, "Brinco Argola", 1000, 20);
        let colar = stocked_item(&items, "Colar Veneziana", 2500, 20);

        // Paid with PIX: 2x brinco.
        let pix = create_order(&orders, None).unwrap();
        add_item_to_order(&orders, &items, pix.id_typed(), brinco.id_typed(), 2).unwrap();
        pay_order(&orders, &items, pix.id_typed(), PaymentMethod::Pix).unwrap();

        // Paid with cash: 1x brinco + 1x colar.
        let money = create_order(&orders, None).unwrap();
        add_item_to_order(&orders, &items, money.id_typed(), brinco.id_typed(), 1).unwrap();
        add_item_to_order(&orders, &items, money.id_typed(), colar.id_typed(), 1).unwrap();
        pay_order(&orders, &items, money.id_typed(), PaymentMethod::Money).unwrap();

        // Still open: must not appear.
        let open = create_order(&orders, None).unwrap();
        add_item_to_order(&orders, &items, open.id_typed(), colar.id_typed(), 5).unwrap();

        let date = pix.created_at().date_naive();
        let summary = get_orders_summary(&orders, date).unwrap();

        assert_eq!(summary.total_orders, 2);
        assert_eq!(summary.total_cents, 2000 + 1000 + 2500);
        assert_eq!(summary.com_numbers, vec!["COM-0001", "COM-0002"]);

        let total_for = |method| {
            summary
                .totals_by_payment_method
                .iter()
                .find(|(m, _)| *m == method)
                .map(|(_, total)| *total)
                .unwrap()
        };
        assert_eq!(total_for(PaymentMethod::Pix), 2000);
        assert_eq!(total_for(PaymentMethod::Money), 3500);
        assert_eq!(total_for(PaymentMethod::CreditCard), 0);
        assert_eq!(total_for(PaymentMethod::DebitCard), 0);

        let brinco_sold = summary
            .products_sold
            .iter()
            .find(|p| p.item_id == brinco.id_typed())
            .unwrap();
        assert_eq!(brinco_sold.quantity_sold, 3);
        assert_eq!(brinco_sold.total_cents, 3000);

        assert_eq!(summary.sales_lines.len(), 3);
        assert_eq!(summary.sales_lines[0].com_number, "COM-0001");
    }

    #[test]
    fn empty_day_yields_a_zero_summary() {
        let orders = InMemoryOrderRepository::new();
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let summary = get_orders_summary(&orders, date).unwrap();

        assert_eq!(summary.total_orders, 0);
        assert_eq!(summary.total_cents, 0);
        assert!(summary.com_numbers.is_empty());
        assert!(summary.products_sold.is_empty());
        assert!(summary.sales_lines.is_empty());
        assert_eq!(summary.totals_by_payment_method.len(), 4);
        assert!(summary.totals_by_payment_method.iter().all(|(_, t)| *t == 0));
    }
}
