use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::users::UserRole;
use crate::models::{Address, User};

/// Shared by create and update; updates overwrite every mutable field that is
/// present. An absent address leaves the stored address untouched.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Option<UserRole>,
    pub address: Option<Address>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub items: Vec<User>,
}
