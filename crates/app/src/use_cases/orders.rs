//! Comanda (order) use cases.

use chrono::NaiveDate;
use tracing::info;

use comanda_catalog::ItemId;
use comanda_core::DomainError;
use comanda_sales::{Order, OrderId, OrderLine, OrderStatus, PaymentMethod};

use crate::error::{AppError, AppResult};
use crate::ports::{ItemRepository, OrderRepository, Page, Pagination};

/// Opens an empty comanda (status OPEN, total 0) with the next COM number.
pub fn create_order<R: OrderRepository>(orders: &R, client: Option<&str>) -> AppResult<Order> {
    let com_number = orders.next_com_number()?;
    let order = Order::open(OrderId::new(), com_number, client.map(str::to_string));
    orders.save(&order)?;
    info!(order_id = %order.id_typed(), com_number = order.com_number(), "comanda opened");
    Ok(order)
}

pub fn get_order_by_id<R: OrderRepository>(orders: &R, id: OrderId) -> AppResult<Option<Order>> {
    Ok(orders.find_by_id(id)?)
}

/// Listing filters, combined with AND. `status: None` means all statuses;
/// the date bounds are inclusive and compared on the UTC calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl OrderFilter {
    fn matches(&self, order: &Order) -> bool {
        if let Some(status) = self.status {
            if order.status() != status {
                return false;
            }
        }
        let day = order.created_at().date_naive();
        if let Some(start) = self.start_date {
            if day < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if day > end {
                return false;
            }
        }
        true
    }
}

pub fn list_orders<R>(orders: &R, filter: OrderFilter, pagination: Pagination) -> AppResult<Page<Order>>
where
    R: OrderRepository,
{
    let filtered = orders
        .find_all()?
        .into_iter()
        .filter(|o| filter.matches(o))
        .collect();
    Ok(Page::paginate(filtered, pagination))
}

/// Adds a product to an open comanda; price and name are snapshotted from the
/// catalog into the line. Returns `None` when the comanda does not exist.
pub fn add_item_to_order<O, I>(
    orders: &O,
    items: &I,
    order_id: OrderId,
    item_id: ItemId,
    quantity: u32,
) -> AppResult<Option<Order>>
where
    O: OrderRepository,
    I: ItemRepository,
{
    let Some(mut order) = orders.find_by_id(order_id)? else {
        return Ok(None);
    };

    let Some(item) = items.find_by_id(item_id)? else {
        return Err(AppError::Validation(format!(
            "cannot add: product with id {item_id} does not exist"
        )));
    };

    let line = OrderLine::new(item.id_typed(), quantity, item.price_cents(), item.name())?;
    order.add_line(line)?;
    orders.save(&order)?;
    Ok(Some(order))
}

/// Removes a product from an open comanda.
/// Returns `None` when the comanda does not exist.
pub fn remove_item_from_order<R>(
    orders: &R,
    order_id: OrderId,
    item_id: ItemId,
) -> AppResult<Option<Order>>
where
    R: OrderRepository,
{
    let Some(mut order) = orders.find_by_id(order_id)? else {
        return Ok(None);
    };

    order.remove_line(item_id).map_err(|err| match err {
        DomainError::InvariantViolation(_) => AppError::Validation(
            "cannot remove a product from a paid comanda; only open comandas can be edited"
                .to_string(),
        ),
        DomainError::NotFound => {
            AppError::Validation("product not found in this comanda".to_string())
        }
        other => other.into(),
    })?;

    orders.save(&order)?;
    Ok(Some(order))
}

/// Closes (pays) a comanda and deducts the sold quantities from stock.
///
/// Stock for every line is validated before anything is written, so a
/// failing line leaves both the comanda and the catalog untouched.
/// Returns `None` when the comanda does not exist.
pub fn pay_order<O, I>(
    orders: &O,
    items: &I,
    order_id: OrderId,
    payment_method: PaymentMethod,
) -> AppResult<Option<Order>>
where
    O: OrderRepository,
    I: ItemRepository,
{
    let Some(mut order) = orders.find_by_id(order_id)? else {
        return Ok(None);
    };

    if order.lines().is_empty() {
        return Err(AppError::Validation(
            "cannot close the comanda: at least one product is required".to_string(),
        ));
    }

    let mut to_deduct = Vec::with_capacity(order.lines().len());
    for line in order.lines() {
        let Some(item) = items.find_by_id(line.item_id())? else {
            return Err(AppError::Validation(format!(
                "product with id {} not found in catalog; cannot close the comanda",
                line.item_id()
            )));
        };
        if item.quantity() < line.quantity() {
            return Err(AppError::Validation(format!(
                "insufficient stock for \"{}\": available {}, requested {}",
                item.name(),
                item.quantity(),
                line.quantity()
            )));
        }
        to_deduct.push((item, line.quantity()));
    }

    for (mut item, quantity) in to_deduct {
        item.deduct_quantity(quantity)?;
        items.save(&item)?;
    }

    order.pay(payment_method)?;
    orders.save(&order)?;
    info!(
        order_id = %order.id_typed(),
        com_number = order.com_number(),
        total_cents = order.total_cents(),
        "comanda paid"
    );
    Ok(Some(order))
}
