use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

/// Price and stock arrive as text and are coerced to numerics by the service;
/// non-numeric input is a validation failure. The same shape is used for
/// create and for full-overwrite updates.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub stock_quantity: String,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}
