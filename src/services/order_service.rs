use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use crate::{
    audit::log_audit,
    dto::orders::OrderList,
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
            OrderStatus,
        },
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::identity::RequestUser,
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::cart_service,
    state::AppState,
};

/// Snapshots the caller's cart into an immutable order. Cart read, stock
/// check and decrement, order write and cart clear all happen in one
/// transaction; any failure rolls back and leaves the cart untouched.
pub async fn create_order(state: &AppState, user: &RequestUser) -> AppResult<ApiResponse<Order>> {
    let txn = state.orm.begin().await?;

    let cart_rows = cart_service::cart_items_for_update(&txn, user.user_id).await?;
    if cart_rows.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let product_ids: Vec<i64> = cart_rows.iter().map(|row| row.product_id).collect();
    let products: HashMap<i64, i32> = Products::find()
        .filter(ProdCol::Id.is_in(product_ids))
        .lock(LockType::Update)
        .all(&txn)
        .await?
        .into_iter()
        .map(|p| (p.id, p.stock_quantity))
        .collect();

    let mut total_amount = Decimal::ZERO;
    for row in &cart_rows {
        let stock = products
            .get(&row.product_id)
            .copied()
            .ok_or_else(|| AppError::BadRequest("product no longer exists".into()))?;
        if stock < row.quantity {
            return Err(AppError::BadRequest(format!(
                "insufficient stock for product {}",
                row.product_id
            )));
        }
        total_amount += row.unit_price * Decimal::from(row.quantity);
    }

    let order = OrderActive {
        id: NotSet,
        user_id: Set(user.user_id),
        status: Set(OrderStatus::Confirmed),
        total_amount: Set(total_amount),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(cart_rows.len());
    for row in &cart_rows {
        let item = OrderItemActive {
            id: NotSet,
            order_id: Set(order.id),
            product_id: Set(row.product_id),
            quantity: Set(row.quantity),
            unit_price: Set(row.unit_price),
        }
        .insert(&txn)
        .await?;
        items.push(order_item_from_entity(item));

        Products::update_many()
            .col_expr(
                ProdCol::StockQuantity,
                Expr::col(ProdCol::StockQuantity).sub(row.quantity),
            )
            .filter(ProdCol::Id.eq(row.product_id))
            .exec(&txn)
            .await?;
    }

    cart_service::clear_cart(&txn, user.user_id).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_create",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order created",
        order_from_entity(order, items),
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &RequestUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }

    let finder = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(orders.len());
    for order in orders {
        let order_items = OrderItems::find()
            .filter(OrderItemCol::OrderId.eq(order.id))
            .all(&state.orm)
            .await?
            .into_iter()
            .map(order_item_from_entity)
            .collect();
        items.push(order_from_entity(order, order_items));
    }

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

pub async fn get_order(
    state: &AppState,
    user: &RequestUser,
    id: i64,
) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        order_from_entity(order, items),
        Some(Meta::empty()),
    ))
}

fn order_from_entity(model: OrderModel, items: Vec<OrderItem>) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        status: model.status,
        total_amount: model.total_amount,
        items,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

/// `subtotal` exists only in the response shape; it is never persisted.
fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        product_id: model.product_id,
        quantity: model.quantity,
        unit_price: model.unit_price,
        subtotal: model.unit_price * Decimal::from(model.quantity),
    }
}
