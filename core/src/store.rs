//! The application's query cache for blogs.
//!
//! `BlogStore` is created once at startup and owned by the application root.
//! It wires `BlogApi` calls into two `QueryCache`s, one for the collection and
//! one for single blogs, and exposes the create mutation that invalidates
//! them.

use std::sync::Arc;

use futures::FutureExt;
use tracing::info;

use crate::api::BlogApi;
use crate::error::ApiError;
use crate::mutation::{Mutation, MutationState};
use crate::query::{Fetcher, QueryCache, QueryKey, QueryObserver};
use crate::types::{Blog, CreateBlog};

/// Query keys used by the store.
pub mod keys {
    use crate::query::QueryKey;

    pub const COLLECTION: &str = "blogs";

    /// `["blogs"]`: the collection, and the prefix of every blog key.
    pub fn all() -> QueryKey {
        QueryKey::new([COLLECTION])
    }

    /// `["blogs", id]`
    pub fn detail(id: &str) -> QueryKey {
        all().child(id)
    }
}

#[derive(Debug, Clone)]
pub struct BlogStore {
    api: BlogApi,
    lists: QueryCache<Vec<Blog>>,
    details: QueryCache<Blog>,
}

impl BlogStore {
    pub fn new(api: BlogApi) -> Self {
        Self {
            api,
            lists: QueryCache::new(),
            details: QueryCache::new(),
        }
    }

    pub fn api(&self) -> &BlogApi {
        &self.api
    }

    /// Observe the collection.
    pub fn blogs(&self) -> QueryObserver<Vec<Blog>> {
        self.lists.observe(keys::all(), self.list_fetcher())
    }

    /// Observe one blog. `None` yields a disabled observer that never fetches.
    pub fn blog(&self, id: Option<&str>) -> QueryObserver<Blog> {
        match id {
            Some(id) => self.details.observe(keys::detail(id), self.detail_fetcher(id)),
            None => QueryObserver::disabled(),
        }
    }

    pub async fn fetch_blogs(&self) -> Result<Vec<Blog>, ApiError> {
        self.lists.fetch(keys::all(), self.list_fetcher()).await
    }

    pub async fn fetch_blog(&self, id: &str) -> Result<Blog, ApiError> {
        self.details.fetch(keys::detail(id), self.detail_fetcher(id)).await
    }

    /// Invalidate every cached key under `prefix`, in both caches.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        self.lists.invalidate(prefix) + self.details.invalidate(prefix)
    }

    pub fn create_mutation(&self) -> CreateBlogMutation {
        CreateBlogMutation {
            store: self.clone(),
            mutation: Arc::new(Mutation::new()),
        }
    }

    fn list_fetcher(&self) -> Fetcher<Vec<Blog>> {
        let api = self.api.clone();
        Arc::new(move || {
            let api = api.clone();
            async move { api.list_blogs().await }.boxed()
        })
    }

    fn detail_fetcher(&self, id: &str) -> Fetcher<Blog> {
        let api = self.api.clone();
        let id = id.to_string();
        Arc::new(move || {
            let api = api.clone();
            let id = id.clone();
            async move { api.get_blog(&id).await }.boxed()
        })
    }
}

/// The create request, tracked as a `Mutation`. Success invalidates every
/// blog key; failure leaves the caches untouched.
#[derive(Debug, Clone)]
pub struct CreateBlogMutation {
    store: BlogStore,
    mutation: Arc<Mutation<Blog>>,
}

impl CreateBlogMutation {
    pub async fn mutate(&self, payload: CreateBlog) -> Result<Blog, ApiError> {
        let api = self.store.api.clone();
        let created = self
            .mutation
            .run(async move { api.create_blog(&payload).await })
            .await?;

        info!(id = %created.id, "created blog");
        self.store.invalidate(&keys::all());
        Ok(created)
    }

    pub fn state(&self) -> MutationState<Blog> {
        self.mutation.state()
    }

    pub fn is_pending(&self) -> bool {
        self.mutation.is_pending()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<MutationState<Blog>> {
        self.mutation.subscribe()
    }

    pub fn reset(&self) {
        self.mutation.reset();
    }
}
