use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{cart::CartList, orders::OrderList, products::ProductList, users::UserList},
    entity::{orders::OrderStatus, users::UserRole},
    models::{Address, CartItem, Order, OrderItem, Product, User},
    response::{ApiResponse, Meta},
    routes::{cart, health, orders, params, products, users},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::list_users,
        users::create_user,
        users::get_user,
        users::update_user,
        products::list_products,
        products::search_products,
        products::create_product,
        products::update_product,
        products::delete_product,
        cart::cart_list,
        cart::add_to_cart,
        cart::remove_from_cart,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
    ),
    components(
        schemas(
            Address,
            User,
            UserRole,
            Product,
            CartItem,
            Order,
            OrderItem,
            OrderStatus,
            UserList,
            ProductList,
            CartList,
            OrderList,
            params::Pagination,
            params::SearchQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartList>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<UserList>,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Users", description = "User profile endpoints"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
