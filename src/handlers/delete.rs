//! Delete an uploaded image.

use async_trait::async_trait;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::handlers::{RequestContext, RouteHandler};
use crate::http::response::ApiError;
use crate::routing::RouteParams;
use crate::storage::{ImageDirectory, ImageStore};

/// DELETE `/delete/<image_id>`: remove the metadata row and the file.
///
/// `image_id` is the stored name (`<uuid><ext>`); the row is keyed by the
/// stem alone.
pub struct DeleteImageHandler {
    store: ImageStore,
    images: ImageDirectory,
}

impl DeleteImageHandler {
    pub fn new(store: ImageStore, images: ImageDirectory) -> Self {
        Self { store, images }
    }

    async fn process(&self, image_id: &str) -> Result<Response, ApiError> {
        let stem = match image_id.rfind('.') {
            Some(idx) if idx > 0 => &image_id[..idx],
            _ => image_id,
        };
        if stem.is_empty() {
            return Err(ApiError::not_found("Image not found"));
        }

        if !self.store.delete_image(stem.to_string()).await? {
            tracing::warn!(image_id, "delete rejected: no such image");
            return Err(ApiError::not_found("Image not found"));
        }

        // Best effort: the row is gone either way.
        if !self.images.remove(image_id).await? {
            tracing::warn!(image_id, "image file was already missing on disk");
        }

        tracing::info!(image_id, "image deleted");
        Ok(Json(json!({ "success": "Image deleted" })).into_response())
    }
}

#[async_trait]
impl RouteHandler for DeleteImageHandler {
    fn name(&self) -> &'static str {
        "delete_image"
    }

    async fn handle(&self, _ctx: RequestContext, params: RouteParams) -> Response {
        let Some(image_id) = params.get("image_id") else {
            return ApiError::not_found("Image not found").into_response();
        };
        match self.process(image_id).await {
            Ok(response) => response,
            Err(e) => e.into_response(),
        }
    }
}
