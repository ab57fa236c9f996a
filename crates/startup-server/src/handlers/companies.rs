//! Company handlers

use crate::error::Result;
use crate::extractors::{JsonBody, Pagination, PathId};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use startup_types::{Company, CompanyInput, CompanyWithProducts, Page};

pub async fn list(
    State(state): State<AppState>,
    Pagination(request): Pagination,
) -> Result<Json<Page<Company>>> {
    Ok(Json(state.catalog.list_companies(request).await?))
}

pub async fn get(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<CompanyWithProducts>> {
    Ok(Json(state.catalog.get_company(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CompanyInput>,
) -> Result<(StatusCode, Json<Company>)> {
    let company = state.catalog.create_company(input).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

pub async fn update(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(input): JsonBody<CompanyInput>,
) -> Result<Json<Company>> {
    Ok(Json(state.catalog.update_company(id, input).await?))
}

pub async fn delete(State(state): State<AppState>, PathId(id): PathId) -> Result<StatusCode> {
    state.catalog.delete_company(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
