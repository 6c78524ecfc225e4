use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

use ecom_backoffice_api::{
    db::{create_orm_conn, create_pool},
    dto::cart::AddToCartRequest,
    entity::{
        Products,
        products::ActiveModel as ProductActive,
        users::{ActiveModel as UserActive, UserRole},
    },
    error::AppError,
    middleware::identity::RequestUser,
    routes::params::Pagination,
    services::{cart_service, order_service},
    state::AppState,
};

// Cart merge and order snapshot flow: add product twice, quantities merge and
// the unit price is preserved; creating the order totals the cart, decrements
// stock and empties the cart.
#[tokio::test]
async fn cart_merge_then_order_snapshot() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user_id = create_user(&state, "cart-merge").await?;
    let product_id = create_product(&state, "Test Widget", "10.00", 10).await?;
    let user = RequestUser { user_id };

    // First add: quantity 2 at unit price 10.00.
    let added = cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id,
            quantity: 2,
        },
    )
    .await?
    .data
    .expect("cart item");
    assert_eq!(added.quantity, 2);
    assert_eq!(added.line_total, dec("20.00"));

    // Second add merges into the same row.
    let merged = cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id,
            quantity: 3,
        },
    )
    .await?
    .data
    .expect("cart item");
    assert_eq!(merged.id, added.id);
    assert_eq!(merged.quantity, 5);
    assert_eq!(merged.unit_price, dec("10.00"));
    assert_eq!(merged.line_total, dec("50.00"));

    let cart = cart_service::list_cart(&state, &user, all_pages())
        .await?
        .data
        .expect("cart");
    assert_eq!(cart.items.len(), 1);

    // Snapshot into an order.
    let order = order_service::create_order(&state, &user)
        .await?
        .data
        .expect("order");
    assert_eq!(order.total_amount, dec("50.00"));
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 5);
    assert_eq!(order.items[0].subtotal, dec("50.00"));

    // Cart is empty afterwards.
    let cart = cart_service::list_cart(&state, &user, all_pages())
        .await?
        .data
        .expect("cart");
    assert!(cart.items.is_empty());

    // Stock was decremented as part of the same transaction.
    let product = Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .expect("product");
    assert_eq!(product.stock_quantity, 5);

    // A second order attempt fails on the now-empty cart.
    let err = order_service::create_order(&state, &user).await;
    assert!(matches!(err, Err(AppError::BadRequest(_))));

    Ok(())
}

#[tokio::test]
async fn add_to_cart_rejects_missing_product_and_over_order() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user_id = create_user(&state, "cart-reject").await?;
    let user = RequestUser { user_id };

    let missing = cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id: i64::MAX,
            quantity: 1,
        },
    )
    .await;
    assert!(matches!(missing, Err(AppError::BadRequest(_))));

    let product_id = create_product(&state, "Scarce Item", "5.00", 1).await?;
    let over = cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id,
            quantity: 2,
        },
    )
    .await;
    assert!(matches!(over, Err(AppError::BadRequest(_))));

    Ok(())
}

#[tokio::test]
async fn removing_unknown_cart_item_is_not_found() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user_id = create_user(&state, "cart-remove").await?;
    let product_id = create_product(&state, "Kept Item", "3.00", 5).await?;
    let user = RequestUser { user_id };

    cart_service::add_to_cart(
        &state,
        &user,
        AddToCartRequest {
            product_id,
            quantity: 1,
        },
    )
    .await?;

    let missing = cart_service::remove_item(&state, &user, i64::MAX).await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    // Cart unchanged.
    let cart = cart_service::list_cart(&state, &user, all_pages())
        .await?
        .data
        .expect("cart");
    assert_eq!(cart.items.len(), 1);

    cart_service::remove_item(&state, &user, product_id).await?;
    let cart = cart_service::list_cart(&state, &user, all_pages())
        .await?
        .data
        .expect("cart");
    assert!(cart.items.is_empty());

    Ok(())
}

fn dec(raw: &str) -> Decimal {
    raw.parse().expect("decimal literal")
}

fn all_pages() -> Pagination {
    Pagination {
        page: Some(1),
        per_page: Some(100),
    }
}

// Tests share a database, so seeded rows get unique names instead of
// truncating tables between runs.
async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration tests."
                );
                return Ok(None);
            }
        };

    let pool = create_pool(&database_url, 5).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    let orm = create_orm_conn(&database_url).await?;

    Ok(Some(AppState { pool, orm }))
}

async fn create_user(state: &AppState, tag: &str) -> anyhow::Result<i64> {
    let user = UserActive {
        id: NotSet,
        first_name: Set("Test".into()),
        last_name: Set("User".into()),
        email: Set(format!("{tag}-{}@example.com", Uuid::new_v4())),
        phone: Set(None),
        role: Set(UserRole::Customer),
        address_street: NotSet,
        address_city: NotSet,
        address_state: NotSet,
        address_zipcode: NotSet,
        address_country: NotSet,
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

async fn create_product(
    state: &AppState,
    name: &str,
    price: &str,
    stock: i32,
) -> anyhow::Result<i64> {
    let product = ProductActive {
        id: NotSet,
        name: Set(format!("{name} {}", Uuid::new_v4())),
        description: Set(Some("integration test product".into())),
        price: Set(price.parse()?),
        stock_quantity: Set(stock),
        category: Set(None),
        image_url: Set(None),
        active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(product.id)
}
