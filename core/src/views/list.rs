use crate::query::QueryState;
use crate::types::{join_categories, Blog};
use crate::views::{failure_message, DateFormat};

/// Number of placeholder rows drawn while the list loads.
pub const LOADING_PLACEHOLDERS: usize = 6;
pub const EMPTY_MESSAGE: &str = "No blogs found.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogListEntry {
    pub id: String,
    pub title: String,
    pub categories: String,
    pub date: String,
    pub description: String,
    pub is_selected: bool,
}

impl BlogListEntry {
    fn new(blog: &Blog, selected: Option<&str>, dates: &DateFormat) -> Self {
        Self {
            id: blog.id.clone(),
            title: blog.title.clone(),
            categories: join_categories(&blog.category),
            date: dates.format(&blog.date),
            description: blog.description.clone(),
            is_selected: selected == Some(blog.id.as_str()),
        }
    }
}

/// What the blog list shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlogListView {
    Loading { placeholders: usize },
    Error { message: String },
    Empty,
    /// One entry per blog, in the order the server returned them.
    Entries(Vec<BlogListEntry>),
}

impl BlogListView {
    pub fn from_state(
        state: &QueryState<Vec<Blog>>,
        selected: Option<&str>,
        dates: &DateFormat,
    ) -> Self {
        if state.is_loading() {
            return BlogListView::Loading {
                placeholders: LOADING_PLACEHOLDERS,
            };
        }
        if state.is_error() {
            return BlogListView::Error {
                message: failure_message("Failed to load blogs", state.error.as_ref()),
            };
        }

        match state.data.as_deref() {
            None | Some([]) => BlogListView::Empty,
            Some(blogs) => BlogListView::Entries(
                blogs
                    .iter()
                    .map(|blog| BlogListEntry::new(blog, selected, dates))
                    .collect(),
            ),
        }
    }

    pub fn entries(&self) -> &[BlogListEntry] {
        match self {
            BlogListView::Entries(entries) => entries,
            _ => &[],
        }
    }

    /// The id reported when the entry at `index` is clicked.
    pub fn click(&self, index: usize) -> Option<String> {
        self.entries().get(index).map(|entry| entry.id.clone())
    }
}
