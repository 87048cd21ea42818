//! Plain-text rendering of the view models.
//!
//! Every function returns the full text of one panel, newline terminated, so
//! the shell can write it in one call and tests can compare whole strings.

use blog_core::views::detail::{NOT_FOUND_MESSAGE, PROMPT_MESSAGE};
use blog_core::views::form::PENDING_LABEL;
use blog_core::views::list::EMPTY_MESSAGE;
use blog_core::{BlogDetailView, BlogListView, CreateBlogForm};

pub const HELP: &str = "\
Commands:
  list        show the blog list
  open <n>    show the blog at position n
  new         create a blog (Enter keeps the current value)
  cancel      discard the draft being created
  refresh     reload the list and the open blog
  help        show this message
  quit        exit
";

const PLACEHOLDER_ROW: &str = "  ░░░░░░░░░░░░░░░░░░░░";

pub fn list(view: &BlogListView) -> String {
    let mut out = String::from("Latest blogs\n");
    match view {
        BlogListView::Loading { placeholders } => {
            for _ in 0..*placeholders {
                out.push_str(PLACEHOLDER_ROW);
                out.push('\n');
            }
        }
        BlogListView::Error { message } => {
            out.push_str(&format!("  {message}\n"));
        }
        BlogListView::Empty => {
            out.push_str(&format!("  {}\n", EMPTY_MESSAGE));
        }
        BlogListView::Entries(entries) => {
            for (index, entry) in entries.iter().enumerate() {
                let marker = if entry.is_selected { '>' } else { ' ' };
                out.push_str(&format!("{marker} {}. {}\n", index + 1, entry.title));
                out.push_str(&format!("     {} · {}\n", entry.categories, entry.date));
                if !entry.description.is_empty() {
                    out.push_str(&format!("     {}\n", entry.description));
                }
            }
        }
    }
    out
}

pub fn detail(view: &BlogDetailView) -> String {
    match view {
        BlogDetailView::Prompt => format!("{}\n", PROMPT_MESSAGE),
        BlogDetailView::Loading => "Loading blog…\n".to_string(),
        BlogDetailView::Error { message } => format!("{message}\n"),
        BlogDetailView::NotFound => format!("{}\n", NOT_FOUND_MESSAGE),
        BlogDetailView::Article(article) => {
            let mut out = String::new();
            if let Some(cover) = &article.cover_image {
                out.push_str(&format!("[cover] {cover}\n"));
            }
            out.push_str(&format!("{}\n", article.title));
            out.push_str(&format!("{} · {}\n", article.categories, article.date));
            if !article.description.is_empty() {
                out.push_str(&format!("\n{}\n", article.description));
            }
            out.push_str(&format!("\n{}\n", article.content));
            out
        }
    }
}

/// Shown while a create request is awaited.
pub fn submitting() -> String {
    format!("  [{PENDING_LABEL}]\n")
}

pub fn form(form: &CreateBlogForm) -> String {
    if !form.is_open() {
        return String::new();
    }
    let draft = form.draft();
    let mut out = String::from("New blog\n");
    for (label, value) in [
        ("Title", &draft.title),
        ("Categories", &draft.category_input),
        ("Description", &draft.description),
        ("Cover image", &draft.cover_image),
        ("Content", &draft.content),
    ] {
        out.push_str(&format!("  {label}: {value}\n"));
    }
    if let Some(error) = form.error() {
        out.push_str(&format!("  ! {error}\n"));
    }
    out.push_str(&format!("  [{}]\n", form.submit_label()));
    out
}
