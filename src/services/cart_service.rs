use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::{
    audit::log_audit,
    dto::cart::{AddToCartRequest, CartList},
    entity::{
        cart_items::{
            ActiveModel as CartActive, Column as CartCol, Entity as CartItems,
            Model as CartItemModel,
        },
        products::Entity as Products,
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::identity::RequestUser,
    models::CartItem,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn add_to_cart(
    state: &AppState,
    user: &RequestUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItem>> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::BadRequest("product not found".to_string())),
    };
    if product.stock_quantity < payload.quantity {
        return Err(AppError::BadRequest("insufficient stock".to_string()));
    }

    let user_exists = Users::find_by_id(user.user_id).one(&state.orm).await?;
    if user_exists.is_none() {
        return Err(AppError::BadRequest("user not found".to_string()));
    }

    let existing = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .filter(CartCol::ProductId.eq(payload.product_id))
        .one(&state.orm)
        .await?;

    let cart_item = if let Some(item) = existing {
        // Merge: quantities add up, the stored unit price is preserved.
        let merged = item.quantity + payload.quantity;
        let mut active: CartActive = item.into();
        active.quantity = Set(merged);
        active.update(&state.orm).await?
    } else {
        CartActive {
            id: NotSet,
            user_id: Set(user.user_id),
            product_id: Set(payload.product_id),
            quantity: Set(payload.quantity),
            unit_price: Set(product.price),
            created_at: NotSet,
        }
        .insert(&state.orm)
        .await?
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_add",
        Some("cart_items"),
        Some(serde_json::json!({
            "product_id": payload.product_id,
            "quantity": payload.quantity
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Added to cart",
        cart_item_from_entity(cart_item),
        None,
    ))
}

pub async fn remove_item(
    state: &AppState,
    user: &RequestUser,
    product_id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .filter(CartCol::ProductId.eq(product_id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_remove",
        Some("cart_items"),
        Some(serde_json::json!({ "product_id": product_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn list_cart(
    state: &AppState,
    user: &RequestUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<CartList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_desc(CartCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(cart_item_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("OK", CartList { items }, Some(meta)))
}

/// Cart rows for a user, locked for the caller's transaction. Order creation
/// reads through this so its stock checks and the later clear see stable rows.
pub(crate) async fn cart_items_for_update<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
) -> AppResult<Vec<CartItemModel>> {
    let rows = CartItems::find()
        .filter(CartCol::UserId.eq(user_id))
        .lock(LockType::Update)
        .all(conn)
        .await?;
    Ok(rows)
}

/// Idempotent; used by order creation inside its transaction.
pub(crate) async fn clear_cart<C: ConnectionTrait>(conn: &C, user_id: i64) -> AppResult<u64> {
    let result = CartItems::delete_many()
        .filter(CartCol::UserId.eq(user_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub(crate) fn cart_item_from_entity(model: CartItemModel) -> CartItem {
    let line_total = model.unit_price * Decimal::from(model.quantity);
    CartItem {
        id: model.id,
        user_id: model.user_id,
        product_id: model.product_id,
        quantity: model.quantity,
        unit_price: model.unit_price,
        line_total,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
