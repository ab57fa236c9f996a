//! `?page=&page_size=` extractor
//!
//! Missing values fall back to page 1 and the configured default size;
//! anything outside the accepted range is a validation error.

use crate::error::ServiceError;
use crate::AppState;
use axum::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;
use startup_types::{PageRequest, ValidationError};

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<i64>,
    page_size: Option<i64>,
}

pub struct Pagination(pub PageRequest);

#[async_trait]
impl FromRequestParts<AppState> for Pagination {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ValidationError::InvalidParameter(rejection.body_text()))?;

        let request = PageRequest::new(
            query.page.unwrap_or(1),
            query
                .page_size
                .unwrap_or_else(|| state.config.default_page_size.into()),
            state.config.max_page_size,
        )?;

        Ok(Self(request))
    }
}
