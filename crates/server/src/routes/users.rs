use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    Json,
};
use models::user::{self, UserChanges};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use service::user_service;
use tracing::info;

use crate::errors::ApiError;
use crate::routes::ServerState;

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
}

/// Omitted and `null` fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UpdateUserInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<UpdateUserInput> for UserChanges {
    fn from(input: UpdateUserInput) -> Self {
        UserChanges { name: input.name, email: input.email }
    }
}

/// Bodies must be JSON objects; arrays and scalars are rejected before the
/// fields are read.
fn object_body<T: DeserializeOwned>(
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<T, ApiError> {
    let Json(fields) = payload?;
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<(StatusCode, Json<user::Model>), ApiError> {
    let input: CreateUserInput = object_body(payload)?;
    let created = user_service::create_user(&state.db, &input.name, &input.email).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<user::Model>>, ApiError> {
    let users = user_service::list_users(&state.db).await?;
    info!(count = users.len(), "list users");
    Ok(Json(users))
}

pub async fn get(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<user::Model>, ApiError> {
    let Path(id) = id?;
    let found = user_service::get_user(&state.db, id).await?;
    Ok(Json(found))
}

pub async fn update(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<user::Model>, ApiError> {
    let Path(id) = id?;
    let input: UpdateUserInput = object_body(payload)?;
    let updated = user_service::update_user(&state.db, id, input.into()).await?;
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    user_service::delete_user(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
