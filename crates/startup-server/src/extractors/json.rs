//! JSON body extractor
//!
//! Wraps axum's `Json` so that a body which fails to deserialize (missing
//! field, unknown enum value, wrong type) is a `VALIDATION_FAILED` error
//! instead of the framework's plain-text 422.

use crate::error::ServiceError;
use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use startup_types::ValidationError;

pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ValidationError::Malformed(rejection.body_text()))?;

        Ok(Self(value))
    }
}
