//! The "new blog" modal: local field state, validation, and the create
//! mutation.

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;
use tokio::sync::watch;

use crate::error::{ApiError, ValidationError};
use crate::mutation::MutationState;
use crate::store::CreateBlogMutation;
use crate::types::{Blog, BlogCategory, CreateBlog};

pub const CREATE_FAILED_MESSAGE: &str = "Failed to create blog.";
pub const SUBMIT_LABEL: &str = "Create blog";
pub const PENDING_LABEL: &str = "Creating…";

/// Raw field values as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogDraft {
    pub title: String,
    /// Comma separated, e.g. `FINANCE, TECH`.
    pub category_input: String,
    pub description: String,
    pub content: String,
    pub cover_image: String,
}

impl BlogDraft {
    /// Comma-separated tags, trimmed, blanks dropped, order and case kept.
    /// Defaults to `FINANCE` when nothing remains.
    pub fn categories(&self) -> Vec<BlogCategory> {
        let categories: Vec<BlogCategory> = self
            .category_input
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(BlogCategory::from)
            .collect();

        if categories.is_empty() {
            vec![BlogCategory::Finance]
        } else {
            categories
        }
    }

    /// Validate and build the create payload, stamped with `now`.
    pub fn to_payload(&self, now: DateTime<Utc>) -> Result<CreateBlog, ValidationError> {
        let title = self.title.trim();
        let content = self.content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(ValidationError::MissingRequired);
        }

        let description = match self.description.trim() {
            "" => title,
            description => description,
        };

        Ok(CreateBlog {
            title: title.to_string(),
            category: self.categories(),
            description: description.to_string(),
            date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            cover_image: self.cover_image.trim().to_string(),
            content: content.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub struct CreateBlogForm {
    is_open: bool,
    draft: BlogDraft,
    error: Option<String>,
    mutation: CreateBlogMutation,
}

impl CreateBlogForm {
    pub fn new(mutation: CreateBlogMutation) -> Self {
        Self {
            is_open: false,
            draft: BlogDraft::default(),
            error: None,
            mutation,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Close and reset every field. Refused while a submission is pending.
    pub fn close(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.reset();
        self.is_open = false;
        true
    }

    pub fn toggle(&mut self) {
        if self.is_open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn draft(&self) -> &BlogDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut BlogDraft {
        &mut self.draft
    }

    /// Form-level error message, if the last submit failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.mutation.is_pending()
    }

    /// Submission state updates, e.g. to show `PENDING_LABEL` while a submit
    /// is awaited elsewhere.
    pub fn subscribe(&self) -> watch::Receiver<MutationState<Blog>> {
        self.mutation.subscribe()
    }

    /// Submit and cancel are disabled while a submission is in flight.
    pub fn controls_disabled(&self) -> bool {
        self.is_submitting()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            PENDING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    /// Validate the current draft and build the payload it would submit.
    pub fn prepare(&self, now: DateTime<Utc>) -> Result<CreateBlog, ValidationError> {
        self.draft.to_payload(now)
    }

    pub async fn submit(&mut self) -> Result<Blog, FormError> {
        self.submit_at(Utc::now()).await
    }

    /// Validate, then create. Success closes and resets the form; failure
    /// keeps it open with every field as typed and sets the form error.
    pub async fn submit_at(&mut self, now: DateTime<Utc>) -> Result<Blog, FormError> {
        self.error = None;

        let payload = match self.prepare(now) {
            Ok(payload) => payload,
            Err(err) => {
                self.error = Some(err.to_string());
                return Err(err.into());
            }
        };

        match self.mutation.mutate(payload).await {
            Ok(blog) => {
                self.reset();
                self.is_open = false;
                Ok(blog)
            }
            Err(err) => {
                let message = err.to_string();
                self.error = Some(if message.trim().is_empty() {
                    CREATE_FAILED_MESSAGE.to_string()
                } else {
                    message
                });
                Err(err.into())
            }
        }
    }

    fn reset(&mut self) {
        self.draft = BlogDraft::default();
        self.error = None;
        self.mutation.reset();
    }
}

impl std::fmt::Debug for CreateBlogForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateBlogForm")
            .field("is_open", &self.is_open)
            .field("draft", &self.draft)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::http::HttpMethod;
    use crate::testing::{blog, blog_json, StubTransport};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 11, 9, 12, 45).unwrap()
    }

    fn draft(title: &str, categories: &str, content: &str) -> BlogDraft {
        BlogDraft {
            title: title.to_string(),
            category_input: categories.to_string(),
            content: content.to_string(),
            ..BlogDraft::default()
        }
    }

    fn filled_form(stub: &StubTransport) -> CreateBlogForm {
        let mut form = CreateBlogForm::new(stub.store().create_mutation());
        form.open();
        *form.draft_mut() = BlogDraft {
            title: "  Future of Fintech ".to_string(),
            category_input: "finance, TECH ,".to_string(),
            description: String::new(),
            content: "Body text".to_string(),
            cover_image: " https://images.example/c.jpg ".to_string(),
        };
        form
    }

    #[test]
    fn categories_are_trimmed_and_blanks_dropped() {
        let categories = draft("t", "finance, TECH ,", "c").categories();
        assert_eq!(
            categories,
            vec![BlogCategory::Other("finance".to_string()), BlogCategory::Tech]
        );
        let payload = draft("t", "finance, TECH ,", "c").to_payload(now()).unwrap();
        assert_eq!(
            serde_json::to_value(&payload.category).unwrap(),
            serde_json::json!(["finance", "TECH"])
        );
    }

    #[test]
    fn empty_category_input_defaults_to_finance() {
        assert_eq!(draft("t", "", "c").categories(), vec![BlogCategory::Finance]);
        assert_eq!(draft("t", " , ,", "c").categories(), vec![BlogCategory::Finance]);
    }

    #[test]
    fn payload_defaults_and_timestamp() {
        let payload = draft("  Title ", "", " Content ").to_payload(now()).unwrap();
        assert_eq!(payload.title, "Title");
        assert_eq!(payload.description, "Title");
        assert_eq!(payload.content, "Content");
        assert_eq!(payload.cover_image, "");
        assert_eq!(payload.date, "2026-01-11T09:12:45.000Z");
    }

    #[test]
    fn blank_title_or_content_is_rejected() {
        assert_eq!(
            draft("   ", "", "content").to_payload(now()),
            Err(ValidationError::MissingRequired)
        );
        assert_eq!(
            draft("title", "", " \n ").to_payload(now()),
            Err(ValidationError::MissingRequired)
        );
    }

    #[tokio::test]
    async fn invalid_submit_sets_error_without_network_call() {
        let stub = StubTransport::new();
        let mut form = CreateBlogForm::new(stub.store().create_mutation());
        form.open();
        form.draft_mut().content = "content only".to_string();

        let err = form.submit_at(now()).await.unwrap_err();

        assert_eq!(err, FormError::Validation(ValidationError::MissingRequired));
        assert_eq!(form.error(), Some("Title and content are required."));
        assert!(form.is_open());
        assert_eq!(stub.request_count(), 0);
    }

    #[tokio::test]
    async fn successful_submit_closes_and_resets() {
        let stub = StubTransport::new();
        stub.respond_to(HttpMethod::Post, "/blogs", 201, blog_json(&blog("5", "Future of Fintech")));
        let mut form = filled_form(&stub);

        let created = form.submit_at(now()).await.unwrap();

        assert_eq!(created.id, "5");
        assert!(!form.is_open());
        assert_eq!(form.draft(), &BlogDraft::default());
        assert_eq!(form.error(), None);

        let sent: CreateBlog =
            serde_json::from_str(stub.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(sent.title, "Future of Fintech");
        assert_eq!(sent.description, "Future of Fintech");
        assert_eq!(sent.cover_image, "https://images.example/c.jpg");
        assert_eq!(sent.date, "2026-01-11T09:12:45.000Z");
    }

    #[tokio::test]
    async fn failed_submit_keeps_form_open_and_populated() {
        let stub = StubTransport::new();
        stub.respond(500, "Internal Server Error", "");
        let mut form = filled_form(&stub);
        let before = form.draft().clone();

        let err = form.submit_at(now()).await.unwrap_err();

        assert!(matches!(err, FormError::Api(_)));
        assert!(form.is_open());
        assert_eq!(form.draft(), &before);
        assert_eq!(
            form.error(),
            Some("Failed to create blog: 500 Internal Server Error")
        );
        assert!(!form.controls_disabled());
        assert_eq!(form.submit_label(), "Create blog");
    }

    #[tokio::test]
    async fn resubmitting_clears_previous_error() {
        let stub = StubTransport::new();
        stub.respond(500, "Internal Server Error", "");
        stub.respond(201, "Created", blog_json(&blog("6", "Retry")));
        let mut form = filled_form(&stub);

        form.submit_at(now()).await.unwrap_err();
        assert!(form.error().is_some());
        form.submit_at(now()).await.unwrap();
        assert_eq!(form.error(), None);
        assert!(!form.is_open());
    }

    #[tokio::test]
    async fn pending_submission_disables_controls() {
        let stub = StubTransport::new();
        stub.respond(201, "Created", blog_json(&blog("7", "Slow")));
        stub.hold();
        let mutation = stub.store().create_mutation();
        let watcher = mutation.clone();
        let mut form = CreateBlogForm::new(mutation);
        form.open();
        *form.draft_mut() = draft("Slow", "", "body");

        let mut updates = form.subscribe();
        let submit = tokio::spawn(async move {
            let result = form.submit_at(now()).await;
            (form, result)
        });
        updates.wait_for(|state| state.is_pending()).await.unwrap();
        assert!(watcher.is_pending());
        stub.release();

        let (form, result) = submit.await.unwrap();
        assert!(result.is_ok());
        assert!(!form.controls_disabled());
        assert_eq!(form.submit_label(), SUBMIT_LABEL);
    }

    #[tokio::test]
    async fn closing_resets_fields_and_error() {
        let stub = StubTransport::new();
        let mut form = CreateBlogForm::new(stub.store().create_mutation());
        form.toggle();
        assert!(form.is_open());
        form.draft_mut().title = "draft".to_string();
        form.submit_at(now()).await.unwrap_err();
        assert!(form.error().is_some());

        assert!(form.close());
        assert!(!form.is_open());
        assert_eq!(form.draft(), &BlogDraft::default());
        assert_eq!(form.error(), None);
    }
}
