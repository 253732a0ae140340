use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use validator::Validate;

use crate::{
    api::{
        AppState,
        types::{CreateUserRequest, UserListQuery, UserResponse, UpdateUserRequest},
    },
    error::AppResult,
};

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> AppResult<Json<UserResponse>> {
    let Json(request) = payload?;
    request.validate()?;
    request.validate_associations()?;

    Ok(Json(state.user_service.create(request).await?))
}

pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<UserResponse>> {
    let Path(id) = id?;

    Ok(Json(state.user_service.get(id).await?))
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<UserListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let Query(query) = query?;

    Ok(Json(state.user_service.list(query).await?))
}

pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> AppResult<Json<UserResponse>> {
    let Path(id) = id?;
    let Json(request) = payload?;
    request.validate()?;
    request.validate_associations()?;

    Ok(Json(state.user_service.update(id, request).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id?;
    state.user_service.delete(id).await?;

    Ok(StatusCode::OK)
}
