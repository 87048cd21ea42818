use crate::query::QueryState;
use crate::types::{join_categories, Blog};
use crate::views::{failure_message, DateFormat};

pub const PROMPT_MESSAGE: &str = "Select a blog from the list on the left to see full details here.";
pub const NOT_FOUND_MESSAGE: &str = "Blog not found. Please select another blog from the list.";

/// Everything shown for a loaded blog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogArticle {
    pub cover_image: Option<String>,
    pub title: String,
    pub categories: String,
    pub date: String,
    pub description: String,
    /// Body text exactly as stored, line breaks included.
    pub content: String,
}

impl BlogArticle {
    pub fn new(blog: &Blog, dates: &DateFormat) -> Self {
        Self {
            cover_image: Some(blog.cover_image.clone()).filter(|url| !url.trim().is_empty()),
            title: blog.title.clone(),
            categories: join_categories(&blog.category),
            date: dates.format(&blog.date),
            description: blog.description.clone(),
            content: blog.content.clone(),
        }
    }
}

/// What the detail panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlogDetailView {
    Prompt,
    Loading,
    Error { message: String },
    NotFound,
    Article(BlogArticle),
}

impl BlogDetailView {
    pub fn from_state(
        selected: Option<&str>,
        state: &QueryState<Blog>,
        dates: &DateFormat,
    ) -> Self {
        if selected.is_none() {
            return BlogDetailView::Prompt;
        }
        if state.is_loading() {
            return BlogDetailView::Loading;
        }
        if state.is_error() {
            return BlogDetailView::Error {
                message: failure_message("Failed to load blog details", state.error.as_ref()),
            };
        }
        match &state.data {
            Some(blog) => BlogDetailView::Article(BlogArticle::new(blog, dates)),
            None => BlogDetailView::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, Operation};
    use crate::query::QueryStatus;
    use crate::testing::{blog, utc_dates};

    fn view(selected: Option<&str>, state: &QueryState<Blog>) -> BlogDetailView {
        BlogDetailView::from_state(selected, state, &utc_dates())
    }

    fn state(status: QueryStatus, data: Option<Blog>) -> QueryState<Blog> {
        QueryState {
            status,
            data,
            error: None,
            is_stale: false,
        }
    }

    #[test]
    fn nothing_selected_prompts() {
        assert_eq!(view(None, &QueryState::idle()), BlogDetailView::Prompt);
    }

    #[test]
    fn loading_then_article() {
        let loading = state(QueryStatus::Loading, None);
        assert_eq!(view(Some("1"), &loading), BlogDetailView::Loading);

        let mut post = blog("1", "One");
        post.content = "First paragraph.\n\n    indented line".to_string();
        post.cover_image = "https://images.example/cover.jpg".to_string();
        let loaded = state(QueryStatus::Success, Some(post));

        let BlogDetailView::Article(article) = view(Some("1"), &loaded) else {
            panic!("expected article");
        };
        assert_eq!(article.title, "One");
        assert_eq!(article.categories, "FINANCE • TECH");
        assert_eq!(article.date, "Jan 11, 2026");
        assert_eq!(article.content, "First paragraph.\n\n    indented line");
        assert_eq!(article.cover_image.as_deref(), Some("https://images.example/cover.jpg"));
    }

    #[test]
    fn empty_cover_image_is_omitted() {
        let loaded = state(QueryStatus::Success, Some(blog("1", "One")));
        let BlogDetailView::Article(article) = view(Some("1"), &loaded) else {
            panic!("expected article");
        };
        assert!(article.cover_image.is_none());
    }

    #[test]
    fn missing_blog_error_is_shown_inline() {
        let failed = QueryState {
            status: QueryStatus::Error,
            data: None,
            error: Some(ApiError::Network {
                operation: Operation::GetBlog("9".to_string()),
                status: Some(404),
                reason: "Not Found".to_string(),
            }),
            is_stale: false,
        };
        assert_eq!(
            view(Some("9"), &failed),
            BlogDetailView::Error {
                message: "Failed to load blog details: Failed to fetch blog with id 9: 404 Not Found"
                    .to_string()
            }
        );
    }

    #[test]
    fn settled_without_data_is_not_found() {
        assert_eq!(view(Some("9"), &QueryState::idle()), BlogDetailView::NotFound);
    }
}
