use rust_decimal::Decimal;

use ecom_backoffice_api::{config::AppConfig, db::create_pool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, config.max_db_connections).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let user_id = ensure_user(&pool, "Jane", "Doe", "jane.doe@example.com").await?;
    seed_products(&pool).await?;

    println!("Seed completed. User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    first_name: &str,
    last_name: &str,
    email: &str,
) -> anyhow::Result<i64> {
    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        println!("User {email} already present");
        return Ok(id);
    }

    let row: (i64,) = sqlx::query_as(
        r#"
        INSERT INTO users (first_name, last_name, email, phone, role,
                           address_street, address_city, address_state,
                           address_zipcode, address_country)
        VALUES ($1, $2, $3, $4, 'CUSTOMER', $5, $6, $7, $8, $9)
        RETURNING id
        "#,
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind("+1-555-0100")
    .bind("1 Main St")
    .bind("Springfield")
    .bind("IL")
    .bind("62701")
    .bind("USA")
    .fetch_one(pool)
    .await?;

    println!("Seeded user {email}");
    Ok(row.0)
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let products = vec![
        ("Espresso Machine", "Compact 15-bar espresso maker", "249.99", 25, "kitchen"),
        ("Standing Desk", "Height-adjustable desk, 120cm", "399.00", 10, "furniture"),
        ("Wireless Mouse", "Low-latency 2.4GHz mouse", "29.90", 200, "electronics"),
        ("Ceramic Mug", "350ml stoneware mug", "12.50", 150, "kitchen"),
    ];

    for (name, desc, price, stock, category) in products {
        let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM products WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        if exists.is_some() {
            continue;
        }

        let price: Decimal = price.parse()?;
        sqlx::query(
            r#"
            INSERT INTO products (name, description, price, stock_quantity, category, active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            "#,
        )
        .bind(name)
        .bind(desc)
        .bind(price)
        .bind(stock)
        .bind(category)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
