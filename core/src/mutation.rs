//! Tracks a single write request through `idle -> pending -> {success | error}`.

use std::future::Future;

use tokio::sync::watch;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStatus {
    Idle,
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MutationState<T> {
    pub status: MutationStatus,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T> MutationState<T> {
    pub fn idle() -> Self {
        Self {
            status: MutationStatus::Idle,
            data: None,
            error: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == MutationStatus::Pending
    }

    pub fn is_error(&self) -> bool {
        self.status == MutationStatus::Error
    }

    pub fn is_success(&self) -> bool {
        self.status == MutationStatus::Success
    }
}

/// Observable status of the most recent run of a write request.
#[derive(Debug)]
pub struct Mutation<T> {
    state: watch::Sender<MutationState<T>>,
}

impl<T: Clone> Mutation<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(MutationState::idle());
        Self { state }
    }

    pub fn subscribe(&self) -> watch::Receiver<MutationState<T>> {
        self.state.subscribe()
    }

    pub fn state(&self) -> MutationState<T> {
        self.state.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().is_pending()
    }

    /// Drive `request` to completion, publishing each transition.
    pub async fn run<F>(&self, request: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        self.state.send_replace(MutationState {
            status: MutationStatus::Pending,
            data: None,
            error: None,
        });

        let result = request.await;
        self.state.send_replace(match &result {
            Ok(data) => MutationState {
                status: MutationStatus::Success,
                data: Some(data.clone()),
                error: None,
            },
            Err(err) => MutationState {
                status: MutationStatus::Error,
                data: None,
                error: Some(err.clone()),
            },
        });
        result
    }

    pub fn reset(&self) {
        self.state.send_replace(MutationState::idle());
    }
}

impl<T: Clone> Default for Mutation<T> {
    fn default() -> Self {
        Self::new()
    }
}
