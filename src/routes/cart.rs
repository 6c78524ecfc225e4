use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get},
};

use crate::{
    dto::cart::{AddToCartRequest, CartList},
    error::AppResult,
    middleware::identity::RequestUser,
    models::CartItem,
    response::ApiResponse,
    routes::params::Pagination,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_list).post(add_to_cart))
        .route("/items/{product_id}", delete(remove_from_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    params(
        ("X-User-ID" = i64, Header, description = "Calling user id"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Cart items for the calling user", body = ApiResponse<CartList>)
    ),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    user: RequestUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<CartList>>> {
    let response = cart_service::list_cart(&state, &user, pagination).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    params(
        ("X-User-ID" = i64, Header, description = "Calling user id"),
    ),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Added or merged cart item", body = ApiResponse<CartItem>),
        (status = 400, description = "Unknown product or insufficient stock"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: RequestUser,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let response = cart_service::add_to_cart(&state, &user, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/cart/items/{product_id}",
    params(
        ("X-User-ID" = i64, Header, description = "Calling user id"),
        ("product_id" = i64, Path, description = "Product ID"),
    ),
    responses(
        (status = 200, description = "Removed from cart"),
        (status = 404, description = "Cart item not found"),
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: RequestUser,
    Path(product_id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let response = cart_service::remove_item(&state, &user, product_id).await?;
    Ok(Json(response))
}
