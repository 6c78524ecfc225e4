use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use chrono::Utc;

use crate::{
    audit::log_audit,
    dto::users::{UserList, UserRequest},
    entity::users::{ActiveModel, Column, Entity as Users, Model as UserModel, UserRole},
    error::{AppError, AppResult},
    models::{Address, User},
    response::ApiResponse,
    state::AppState,
};

pub async fn fetch_all_users(state: &AppState) -> AppResult<ApiResponse<UserList>> {
    let items = Users::find()
        .order_by_asc(Column::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(user_from_entity)
        .collect();

    Ok(ApiResponse::success("Users", UserList { items }, None))
}

pub async fn fetch_user(state: &AppState, id: i64) -> AppResult<ApiResponse<User>> {
    let user = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(user_from_entity);
    let user = match user {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("User", user, None))
}

pub async fn add_user(
    state: &AppState,
    payload: UserRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let mut active = ActiveModel {
        id: NotSet,
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
        email: Set(payload.email),
        phone: Set(payload.phone),
        role: Set(payload.role.unwrap_or(UserRole::Customer)),
        address_street: NotSet,
        address_city: NotSet,
        address_state: NotSet,
        address_zipcode: NotSet,
        address_country: NotSet,
        created_at: NotSet,
    };
    if let Some(address) = payload.address {
        apply_address(&mut active, address);
    }
    let user = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "user_create",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::message_only("User Added"))
}

pub async fn update_user(
    state: &AppState,
    id: i64,
    payload: UserRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = Users::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    active.first_name = Set(payload.first_name);
    active.last_name = Set(payload.last_name);
    active.email = Set(payload.email);
    active.phone = Set(payload.phone);
    if let Some(role) = payload.role {
        active.role = Set(role);
    }
    // Absent address leaves the stored columns as they are.
    if let Some(address) = payload.address {
        apply_address(&mut active, address);
    }
    active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(id),
        "user_update",
        Some("users"),
        Some(serde_json::json!({ "user_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::message_only("user updated"))
}

fn apply_address(active: &mut ActiveModel, address: Address) {
    active.address_street = Set(address.street);
    active.address_city = Set(address.city);
    active.address_state = Set(address.state);
    active.address_zipcode = Set(address.zipcode);
    active.address_country = Set(address.country);
}

fn user_from_entity(model: UserModel) -> User {
    let address = match (
        model.address_street,
        model.address_city,
        model.address_state,
        model.address_zipcode,
        model.address_country,
    ) {
        (None, None, None, None, None) => None,
        (street, city, state, zipcode, country) => Some(Address {
            street,
            city,
            state,
            zipcode,
            country,
        }),
    };

    User {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        phone: model.phone,
        role: model.role,
        address,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
