//! Product handlers

use crate::error::Result;
use crate::extractors::{JsonBody, PathId};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use startup_types::{NewProduct, Product, ProductInput};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog.list_products().await?))
}

pub async fn get(State(state): State<AppState>, PathId(id): PathId) -> Result<Json<Product>> {
    Ok(Json(state.catalog.get_product(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.catalog.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(input): JsonBody<ProductInput>,
) -> Result<Json<Product>> {
    Ok(Json(state.catalog.update_product(id, input).await?))
}

pub async fn delete(State(state): State<AppState>, PathId(id): PathId) -> Result<StatusCode> {
    state.catalog.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
