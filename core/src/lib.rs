//! Client core for the blog service.
//!
//! # Overview
//! Layers, leaf to root:
//! - `types`: the `Blog` entity and its create payload.
//! - `client` / `http`: builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network.
//! - `transport` / `api`: executes those requests, one round trip per call.
//! - `query` / `mutation` / `store`: keyed caching with request
//!   de-duplication, observable loading/error state, and invalidation after a
//!   successful create.
//! - `views`: list, detail and creation-form view models.
//! - `app`: the root that owns the store and the current selection.
//!
//! # Design
//! - `BlogClient` is stateless; the I/O boundary is the `Transport` trait.
//! - The cache is an explicit `BlogStore` object, created once and owned by
//!   `BlogApp`. Nothing is global.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod app;
pub mod client;
pub mod error;
pub mod http;
pub mod mutation;
pub mod query;
pub mod store;
pub mod transport;
pub mod types;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

pub use api::BlogApi;
pub use app::BlogApp;
pub use client::BlogClient;
pub use error::{ApiError, Operation, TransportError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use mutation::{Mutation, MutationState, MutationStatus};
pub use query::{QueryCache, QueryKey, QueryObserver, QueryState, QueryStatus};
pub use store::{BlogStore, CreateBlogMutation};
pub use transport::{ReqwestTransport, Transport};
pub use types::{Blog, BlogCategory, CreateBlog};
pub use views::{
    format_blog_date, parse_locale, BlogArticle, BlogDetailView, BlogDraft, BlogListEntry,
    BlogListView, CreateBlogForm, DateFormat, DisplayZone, FormError,
};
