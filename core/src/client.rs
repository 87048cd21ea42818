//! Stateless HTTP request builder and response parser for the blog API.
//!
//! # Design
//! `BlogClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! `BlogApi` glues the two halves together around a `Transport`.

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{ApiError, Operation};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Blog, CreateBlog};

const COLLECTION: &str = "blogs";

/// Synchronous, stateless client for the blog API.
#[derive(Debug, Clone)]
pub struct BlogClient {
    base_url: Url,
}

impl BlogClient {
    pub fn new(base_url: &Url) -> Self {
        Self {
            base_url: base_url.clone(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn build_list_blogs(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.endpoint(None),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get_blog(&self, id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.endpoint(Some(id)),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_blog(&self, input: &CreateBlog) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.endpoint(None),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn parse_list_blogs(&self, response: HttpResponse) -> Result<Vec<Blog>, ApiError> {
        decode(Operation::ListBlogs, response)
    }

    pub fn parse_get_blog(&self, id: &str, response: HttpResponse) -> Result<Blog, ApiError> {
        decode(Operation::GetBlog(id.to_string()), response)
    }

    pub fn parse_create_blog(&self, response: HttpResponse) -> Result<Blog, ApiError> {
        decode(Operation::CreateBlog, response)
    }

    /// `{base}/blogs` or `{base}/blogs/{id}`, with `id` encoded as one segment.
    fn endpoint(&self, id: Option<&str>) -> String {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(COLLECTION);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url.to_string()
    }
}

/// Reject non-2xx statuses, then decode the body.
fn decode<T: DeserializeOwned>(operation: Operation, response: HttpResponse) -> Result<T, ApiError> {
    check_status(&operation, &response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode {
        operation,
        reason: e.to_string(),
    })
}

fn check_status(operation: &Operation, response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Network {
        operation: operation.clone(),
        status: Some(response.status),
        reason: response.status_text.clone(),
    })
}
