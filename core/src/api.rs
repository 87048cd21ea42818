//! Remote access layer: one `BlogClient` build/parse pair per call, executed
//! over a `Transport`.
//!
//! Every call performs exactly one round trip and never retries.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::client::BlogClient;
use crate::error::{ApiError, Operation, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{Blog, CreateBlog};

#[derive(Clone)]
pub struct BlogApi {
    client: BlogClient,
    transport: Arc<dyn Transport>,
}

impl BlogApi {
    pub fn new(client: BlogClient, transport: Arc<dyn Transport>) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &BlogClient {
        &self.client
    }

    pub async fn list_blogs(&self) -> Result<Vec<Blog>, ApiError> {
        let operation = Operation::ListBlogs;
        let response = self.send(&operation, self.client.build_list_blogs()).await?;
        self.client.parse_list_blogs(response).inspect_err(log_failure)
    }

    pub async fn get_blog(&self, id: &str) -> Result<Blog, ApiError> {
        let operation = Operation::GetBlog(id.to_string());
        let response = self.send(&operation, self.client.build_get_blog(id)).await?;
        self.client.parse_get_blog(id, response).inspect_err(log_failure)
    }

    pub async fn create_blog(&self, input: &CreateBlog) -> Result<Blog, ApiError> {
        let request = self.client.build_create_blog(input)?;
        let response = self.send(&Operation::CreateBlog, request).await?;
        self.client.parse_create_blog(response).inspect_err(log_failure)
    }

    async fn send(&self, operation: &Operation, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|TransportError(reason)| ApiError::Network {
                operation: operation.clone(),
                status: None,
                reason,
            })
            .inspect_err(log_failure)?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}

impl std::fmt::Debug for BlogApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogApi")
            .field("base_url", &self.client.base_url().as_str())
            .finish_non_exhaustive()
    }
}

fn log_failure(err: &ApiError) {
    warn!(error = %err, "blog api call failed");
}
