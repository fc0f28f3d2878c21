//! Multipart image upload.

use async_trait::async_trait;
use axum::extract::{FromRequest, Multipart};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::config::{StorageConfig, UploadConfig};
use crate::handlers::{RequestContext, RouteHandler};
use crate::http::response::ApiError;
use crate::routing::RouteParams;
use crate::storage::{ImageDirectory, ImageStore};

#[derive(Serialize)]
struct UploadResponse {
    filename: String,
    original_name: String,
    size: u32,
    file_type: String,
    url: String,
}

/// POST `/upload/`: accept a multipart image, write it to disk and record
/// its metadata.
pub struct UploadHandler {
    store: ImageStore,
    images: ImageDirectory,
    upload: UploadConfig,
    public_prefix: String,
}

impl UploadHandler {
    pub fn new(
        store: ImageStore,
        images: ImageDirectory,
        upload: UploadConfig,
        storage: &StorageConfig,
    ) -> Self {
        Self {
            store,
            images,
            upload,
            public_prefix: storage.public_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Split a client filename into (stem, lowercased extension with dot).
    fn split_name(filename: &str) -> (String, String) {
        match filename.rfind('.') {
            Some(idx) if idx > 0 => (
                filename[..idx].to_string(),
                filename[idx..].to_ascii_lowercase(),
            ),
            _ => (filename.to_string(), String::new()),
        }
    }

    async fn process(&self, ctx: RequestContext) -> Result<Response, ApiError> {
        // Content-Length is checked up front so oversized uploads fail before
        // the body is read; the multipart walk below re-checks actual bytes.
        if let Some(length) = content_length(&ctx.request) {
            if length > self.upload.max_file_size {
                tracing::warn!(length, "upload rejected: file too large");
                return Err(ApiError::too_large("File Too Large"));
            }
        }

        let mut multipart = Multipart::from_request(ctx.request, &())
            .await
            .map_err(|e| ApiError::bad_request(format!("Expected multipart form: {e}")))?;

        let field = loop {
            match multipart
                .next_field()
                .await
                .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
            {
                Some(field) if field.name() == Some("image") => break field,
                Some(_) => continue,
                None => return Err(ApiError::bad_request("Missing `image` field")),
            }
        };

        let client_name = field
            .file_name()
            .map(ToOwned::to_owned)
            .ok_or_else(|| ApiError::bad_request("Missing filename"))?;
        let (original_name, ext) = Self::split_name(&client_name);

        if !self.upload.allowed_extensions.contains(&ext) {
            tracing::warn!(extension = %ext, "upload rejected: file type not allowed");
            return Err(ApiError::bad_request("File type not allowed"));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read image data: {e}")))?;
        if bytes.len() > self.upload.max_file_size {
            tracing::warn!(length = bytes.len(), "upload rejected: file too large");
            return Err(ApiError::too_large("File Too Large"));
        }

        // Header probe rejects bodies that are not actually an image.
        if imagesize::blob_size(&bytes).is_err() {
            tracing::warn!(original_name = %original_name, "upload rejected: invalid image data");
            return Err(ApiError::bad_request("Invalid file"));
        }

        let filename = Uuid::new_v4().to_string();
        let stored_name = format!("{filename}{ext}");
        let size_kib = (bytes.len() as u64).div_ceil(1024) as u32;

        let record = self
            .store
            .add_image(filename, original_name, size_kib, ext)
            .await?;
        self.images.save(&stored_name, &bytes).await?;

        tracing::info!(stored_name = %stored_name, size_kib, "image uploaded");

        let body = UploadResponse {
            url: format!("{}/{stored_name}", self.public_prefix),
            filename: stored_name,
            original_name: record.original_name,
            size: record.size,
            file_type: record.file_type,
        };
        Ok((StatusCode::CREATED, Json(body)).into_response())
    }
}

fn content_length(request: &axum::http::Request<axum::body::Body>) -> Option<usize> {
    request
        .headers()
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

#[async_trait]
impl RouteHandler for UploadHandler {
    fn name(&self) -> &'static str {
        "post_upload"
    }

    async fn handle(&self, ctx: RequestContext, _params: RouteParams) -> Response {
        match self.process(ctx).await {
            Ok(response) => response,
            Err(e) => e.into_response(),
        }
    }
}
