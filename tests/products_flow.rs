use rust_decimal::Decimal;
use uuid::Uuid;

use ecom_backoffice_api::{
    db::{create_orm_conn, create_pool},
    dto::products::ProductRequest,
    error::AppError,
    routes::params::Pagination,
    services::product_service,
    state::AppState,
};

// Product lifecycle: create from text numerics, appear in the active listing,
// disappear from listing and search after soft delete.
#[tokio::test]
async fn create_list_soft_delete_and_search() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let name = format!("Walnut Bookshelf {}", Uuid::new_v4());
    let created = product_service::create_product(
        &state,
        ProductRequest {
            name: name.clone(),
            description: Some("Five shelves".into()),
            price: "129.99".into(),
            stock_quantity: "7".into(),
            category: Some("furniture".into()),
            image_url: None,
        },
    )
    .await?
    .data
    .expect("product");
    assert!(created.active);
    assert_eq!(created.price, dec("129.99"));
    assert_eq!(created.stock_quantity, 7);

    let listed = product_service::list_products(&state, first_page())
        .await?
        .data
        .expect("products");
    assert!(listed.items.iter().any(|p| p.id == created.id));

    let found = product_service::search_products(&state, &name[..16])
        .await?
        .data
        .expect("products");
    assert!(found.items.iter().any(|p| p.id == created.id));

    product_service::delete_product(&state, created.id).await?;

    let listed = product_service::list_products(&state, first_page())
        .await?
        .data
        .expect("products");
    assert!(listed.items.iter().all(|p| p.id != created.id));

    let found = product_service::search_products(&state, &name)
        .await?
        .data
        .expect("products");
    assert!(found.items.is_empty());

    Ok(())
}

#[tokio::test]
async fn search_skips_out_of_stock_products() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let name = format!("Ghost Lamp {}", Uuid::new_v4());
    product_service::create_product(
        &state,
        ProductRequest {
            name: name.clone(),
            description: None,
            price: "15.00".into(),
            stock_quantity: "0".into(),
            category: None,
            image_url: None,
        },
    )
    .await?;

    let found = product_service::search_products(&state, &name)
        .await?
        .data
        .expect("products");
    assert!(found.items.is_empty());

    Ok(())
}

// `%` and `_` in the keyword are literal characters, not LIKE wildcards.
#[tokio::test]
async fn search_treats_wildcards_literally() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let plain_name = format!("Plain Chair {}", Uuid::new_v4());
    let plain = product_service::create_product(
        &state,
        ProductRequest {
            name: plain_name,
            description: None,
            price: "30.00".into(),
            stock_quantity: "4".into(),
            category: None,
            image_url: None,
        },
    )
    .await?
    .data
    .expect("product");

    let cotton_name = format!("100% Cotton Throw {}", Uuid::new_v4());
    let cotton = product_service::create_product(
        &state,
        ProductRequest {
            name: cotton_name,
            description: None,
            price: "24.00".into(),
            stock_quantity: "4".into(),
            category: None,
            image_url: None,
        },
    )
    .await?
    .data
    .expect("product");

    // A bare `%` keyword must not match products without a percent sign.
    let found = product_service::search_products(&state, "%")
        .await?
        .data
        .expect("products");
    assert!(found.items.iter().all(|p| p.id != plain.id));
    assert!(found.items.iter().any(|p| p.id == cotton.id));

    let found = product_service::search_products(&state, "100% cotton")
        .await?
        .data
        .expect("products");
    assert!(found.items.iter().any(|p| p.id == cotton.id));

    Ok(())
}

#[tokio::test]
async fn update_overwrites_fields_and_misses_are_not_found() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let name = format!("Oak Stool {}", Uuid::new_v4());
    let created = product_service::create_product(
        &state,
        ProductRequest {
            name: name.clone(),
            description: Some("Three legs".into()),
            price: "45.00".into(),
            stock_quantity: "3".into(),
            category: None,
            image_url: None,
        },
    )
    .await?
    .data
    .expect("product");

    let updated = product_service::update_product(
        &state,
        created.id,
        ProductRequest {
            name: name.clone(),
            description: Some("Four legs".into()),
            price: "49.50".into(),
            stock_quantity: "8".into(),
            category: Some("furniture".into()),
            image_url: None,
        },
    )
    .await?
    .data
    .expect("product");
    assert_eq!(updated.price, dec("49.50"));
    assert_eq!(updated.stock_quantity, 8);
    assert_eq!(updated.description.as_deref(), Some("Four legs"));

    let missing = product_service::update_product(
        &state,
        i64::MAX,
        ProductRequest {
            name: "nope".into(),
            description: None,
            price: "1.00".into(),
            stock_quantity: "1".into(),
            category: None,
            image_url: None,
        },
    )
    .await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    let missing = product_service::delete_product(&state, i64::MAX).await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    Ok(())
}

#[tokio::test]
async fn create_rejects_non_numeric_text() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let result = product_service::create_product(
        &state,
        ProductRequest {
            name: "Broken".into(),
            description: None,
            price: "a lot".into(),
            stock_quantity: "5".into(),
            category: None,
            image_url: None,
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let result = product_service::create_product(
        &state,
        ProductRequest {
            name: "Broken".into(),
            description: None,
            price: "5.00".into(),
            stock_quantity: "several".into(),
            category: None,
            image_url: None,
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    Ok(())
}

fn dec(raw: &str) -> Decimal {
    raw.parse().expect("decimal literal")
}

fn first_page() -> Pagination {
    Pagination {
        page: Some(1),
        per_page: Some(100),
    }
}

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
