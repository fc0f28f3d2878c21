//! Paginated image listing.

use async_trait::async_trait;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::handlers::{RequestContext, RouteHandler};
use crate::http::response::ApiError;
use crate::routing::RouteParams;
use crate::storage::{ImageRecord, ImageStore};

#[derive(Serialize)]
struct ImageListResponse {
    images: Vec<ImageRecord>,
    page: u32,
    last_page: bool,
}

/// GET `/api/images/?page=?`: one page of image metadata as JSON.
pub struct ListImagesHandler {
    store: ImageStore,
}

impl ListImagesHandler {
    pub fn new(store: ImageStore) -> Self {
        Self { store }
    }

    /// Clamp a requested page into `1..=last_page`.
    fn clamp_page(requested: u32, count: u64, per_page: u32) -> (u32, u32) {
        let last_page = if count == 0 {
            1
        } else {
            ((count - 1) / u64::from(per_page) + 1) as u32
        };
        (requested.clamp(1, last_page), last_page)
    }
}

#[async_trait]
impl RouteHandler for ListImagesHandler {
    fn name(&self) -> &'static str {
        "get_images"
    }

    async fn handle(&self, _ctx: RequestContext, params: RouteParams) -> Response {
        // Absent capture means page 1; the capture grammar admits non-numeric
        // values like "abc", which are a client error.
        let requested: u32 = match params.get("page").map(String::as_str) {
            None => 1,
            Some(raw) => match raw.parse() {
                Ok(n) => n,
                Err(_) => return ApiError::bad_request("Invalid page number").into_response(),
            },
        };

        let count = match self.store.count_images().await {
            Ok(n) => n,
            Err(e) => return ApiError::from(e).into_response(),
        };
        let (page, last_page) = Self::clamp_page(requested, count, self.store.page_size());

        match self.store.get_images(page).await {
            Ok(images) => Json(ImageListResponse {
                images,
                page,
                last_page: page == last_page,
            })
            .into_response(),
            Err(e) => ApiError::from(e).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_clamps_into_valid_range() {
        // 25 rows, 12 per page -> 3 pages.
        assert_eq!(ListImagesHandler::clamp_page(0, 25, 12), (1, 3));
        assert_eq!(ListImagesHandler::clamp_page(1, 25, 12), (1, 3));
        assert_eq!(ListImagesHandler::clamp_page(3, 25, 12), (3, 3));
        assert_eq!(ListImagesHandler::clamp_page(99, 25, 12), (3, 3));
    }

    #[test]
    fn empty_table_is_one_empty_page() {
        assert_eq!(ListImagesHandler::clamp_page(5, 0, 12), (1, 1));
    }

    #[test]
    fn exact_multiple_has_no_phantom_page() {
        assert_eq!(ListImagesHandler::clamp_page(99, 24, 12), (2, 2));
    }
}
