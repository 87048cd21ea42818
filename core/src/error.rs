//! Error types for the blog API client.
//!
//! # Design
//! A missing blog is not a variant of its own: a 404 lands in
//! `ApiError::Network` like any other non-2xx status, and callers that care
//! ask `is_not_found()`. Transport failures share that variant with
//! `status: None`. A body that arrived but does not match the schema is a
//! `Decode` error, never a network one.
//!
//! Every error is `Clone` so a single failed request can be handed to every
//! observer that was waiting on it.

use std::fmt;

use thiserror::Error;

/// The remote operation an error belongs to. Its `Display` is the message
/// prefix shown to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    ListBlogs,
    GetBlog(String),
    CreateBlog,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ListBlogs => write!(f, "Failed to fetch blogs"),
            Operation::GetBlog(id) => write!(f, "Failed to fetch blog with id {id}"),
            Operation::CreateBlog => write!(f, "Failed to create blog"),
        }
    }
}

/// Errors returned by `BlogClient` parse methods and `BlogApi` calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Transport failure (`status` is `None`) or a non-2xx response, in which
    /// case `reason` holds the status text.
    #[error("{operation}: {}", network_detail(.status, .reason))]
    Network {
        operation: Operation,
        status: Option<u16>,
        reason: String,
    },

    /// The response body could not be decoded into the expected type.
    #[error("{operation}: unexpected response body: {reason}")]
    Decode { operation: Operation, reason: String },

    /// The request payload could not be serialized to JSON.
    #[error("failed to serialize request body: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Network { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }

    /// True when the server answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

fn network_detail(status: &Option<u16>, reason: &str) -> String {
    match status {
        Some(status) => format!("{status} {reason}").trim_end().to_string(),
        None => reason.to_string(),
    }
}

/// Raised by a `Transport` when no HTTP response was received at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Local form validation failure. Never reaches the network layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title and content are required.")]
    MissingRequired,
}
