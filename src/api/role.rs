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
        types::{CreateRoleRequest, RoleListQuery, RoleResponse, UpdateRoleRequest},
    },
    error::AppResult,
};

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateRoleRequest>, JsonRejection>,
) -> AppResult<Json<RoleResponse>> {
    let Json(request) = payload?;
    request.validate()?;
    request.validate_associations()?;

    Ok(Json(state.role_service.create(request).await?))
}

pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<RoleResponse>> {
    let Path(id) = id?;

    Ok(Json(state.role_service.get(id).await?))
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<RoleListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<RoleResponse>>> {
    let Query(query) = query?;

    Ok(Json(state.role_service.list(query).await?))
}

pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateRoleRequest>, JsonRejection>,
) -> AppResult<Json<RoleResponse>> {
    let Path(id) = id?;
    let Json(request) = payload?;
    request.validate()?;
    request.validate_associations()?;

    Ok(Json(state.role_service.update(id, request).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id?;
    state.role_service.delete(id).await?;

    Ok(StatusCode::OK)
}
