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
        types::{CreateMenuRequest, MenuListQuery, MenuResponse, UpdateMenuRequest},
    },
    error::AppResult,
};

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateMenuRequest>, JsonRejection>,
) -> AppResult<Json<MenuResponse>> {
    let Json(request) = payload?;
    request.validate()?;
    request.validate_associations()?;

    Ok(Json(state.menu_service.create(request).await?))
}

pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<MenuResponse>> {
    let Path(id) = id?;

    Ok(Json(state.menu_service.get(id).await?))
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<MenuListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<MenuResponse>>> {
    let Query(query) = query?;

    Ok(Json(state.menu_service.list(query).await?))
}

pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateMenuRequest>, JsonRejection>,
) -> AppResult<Json<MenuResponse>> {
    let Path(id) = id?;
    let Json(request) = payload?;
    request.validate()?;
    request.validate_associations()?;

    Ok(Json(state.menu_service.update(id, request).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id?;
    state.menu_service.delete(id).await?;

    Ok(StatusCode::OK)
}
