//! Presentation-independent view models.
//!
//! Each view is derived from query state and carries exactly what a renderer
//! needs: which state to show, preformatted labels, and the messages users
//! see. Nothing here knows how it will be drawn.

pub mod date;
pub mod detail;
pub mod form;
pub mod list;

pub use date::{format_blog_date, parse_locale, DateFormat, DisplayZone};
pub use detail::{BlogArticle, BlogDetailView};
pub use form::{BlogDraft, CreateBlogForm, FormError};
pub use list::{BlogListEntry, BlogListView};

/// `"{prefix}: {error}"`, or `"{prefix}."` when the error text is blank.
pub(crate) fn failure_message(prefix: &str, error: Option<&crate::ApiError>) -> String {
    match error.map(ToString::to_string) {
        Some(message) if !message.trim().is_empty() => format!("{prefix}: {message}"),
        _ => format!("{prefix}."),
    }
}
