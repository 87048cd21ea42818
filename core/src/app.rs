//! Application root: owns the store, the selection, and the open views.

use crate::query::QueryObserver;
use crate::store::{keys, BlogStore};
use crate::types::Blog;
use crate::views::{BlogDetailView, BlogListView, CreateBlogForm, DateFormat};

pub struct BlogApp {
    store: BlogStore,
    selected: Option<String>,
    list: QueryObserver<Vec<Blog>>,
    detail: QueryObserver<Blog>,
    form: CreateBlogForm,
    dates: DateFormat,
}

impl BlogApp {
    /// Start observing the collection. Must be called inside a tokio runtime.
    pub fn new(store: BlogStore) -> Self {
        let list = store.blogs();
        let form = CreateBlogForm::new(store.create_mutation());
        Self {
            store,
            selected: None,
            list,
            detail: QueryObserver::disabled(),
            form,
            dates: DateFormat::from_env(),
        }
    }

    /// Replace the zone and locale dates are shown in.
    pub fn with_date_format(mut self, dates: DateFormat) -> Self {
        self.dates = dates;
        self
    }

    pub fn date_format(&self) -> &DateFormat {
        &self.dates
    }

    pub fn store(&self) -> &BlogStore {
        &self.store
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Change the selection. Re-selecting the current id is a no-op.
    pub fn select(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.selected.as_deref() == Some(id.as_str()) {
            return;
        }
        self.detail = self.store.blog(Some(&id));
        self.selected = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.detail = QueryObserver::disabled();
    }

    /// Select the list entry at `index`. Returns the selected id.
    pub fn click_entry(&mut self, index: usize) -> Option<String> {
        let id = self.list_view().click(index)?;
        self.select(id.clone());
        Some(id)
    }

    pub fn list_view(&self) -> BlogListView {
        BlogListView::from_state(&self.list.state(), self.selected(), &self.dates)
    }

    pub fn detail_view(&self) -> BlogDetailView {
        BlogDetailView::from_state(self.selected(), &self.detail.state(), &self.dates)
    }

    pub fn form(&self) -> &CreateBlogForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CreateBlogForm {
        &mut self.form
    }

    /// Wait until neither the list nor the detail has a request outstanding.
    pub async fn settle(&mut self) {
        self.list.settled().await;
        self.detail.settled().await;
    }

    /// Mark every blog query stale; observed ones refetch immediately.
    pub fn refresh(&self) -> usize {
        self.store.invalidate(&keys::all())
    }
}
