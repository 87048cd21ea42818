//! Line-oriented command loop over a `BlogApp`.
//!
//! # Design
//! The shell reads from any `AsyncBufRead` and writes to any `io::Write`, so
//! tests drive it with a byte slice and a `Vec<u8>`. Every command waits for
//! the app to settle before rendering, which keeps output deterministic.

use std::io::Write;
use std::ops::ControlFlow;
use std::str::FromStr;

use blog_core::{BlogApp, BlogDraft};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::render;

const GREETING: &str = "Type `help` for the list of commands.\n";
const RETRY_HINT: &str = "Run `new` to edit the draft or `cancel` to discard it.\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    List,
    /// 1-based position in the list.
    Open(usize),
    New,
    Cancel,
    Refresh,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default();
        let command = match name {
            "list" | "ls" => Command::List,
            "open" => {
                let position = words
                    .next()
                    .and_then(|n| n.parse::<usize>().ok())
                    .filter(|n| *n > 0)
                    .ok_or_else(|| "Usage: open <n>, where n is a position in the list.".to_string())?;
                Command::Open(position)
            }
            "new" => Command::New,
            "cancel" => Command::Cancel,
            "refresh" => Command::Refresh,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("Unknown command `{other}`. {}", GREETING.trim_end())),
        };
        if words.next().is_some() {
            return Err(format!("`{name}` takes no extra arguments."));
        }
        Ok(command)
    }
}

/// Draft fields, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Categories,
    Description,
    CoverImage,
    Content,
}

impl Field {
    const ALL: [Field; 5] = [
        Field::Title,
        Field::Categories,
        Field::Description,
        Field::CoverImage,
        Field::Content,
    ];

    fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Categories => "Categories (comma separated)",
            Field::Description => "Description",
            Field::CoverImage => "Cover image URL",
            Field::Content => "Content",
        }
    }

    fn value_mut(self, draft: &mut BlogDraft) -> &mut String {
        match self {
            Field::Title => &mut draft.title,
            Field::Categories => &mut draft.category_input,
            Field::Description => &mut draft.description,
            Field::CoverImage => &mut draft.cover_image,
            Field::Content => &mut draft.content,
        }
    }
}

pub struct Shell<R, W> {
    app: BlogApp,
    input: R,
    output: W,
}

impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(app: BlogApp, input: R, output: W) -> Self {
        Self { app, input, output }
    }

    pub fn app(&self) -> &BlogApp {
        &self.app
    }

    /// Render the list, then execute commands until `quit` or end of input.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        self.show_list().await?;
        self.write(GREETING)?;

        while let Some(line) = self.prompt("> ").await? {
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(command) => {
                    debug!(?command, "executing");
                    if self.execute(command).await?.is_break() {
                        break;
                    }
                }
                Err(message) => self.write(&format!("{message}\n"))?,
            }
        }
        Ok(())
    }

    pub async fn execute(&mut self, command: Command) -> anyhow::Result<ControlFlow<()>> {
        match command {
            Command::List => self.show_list().await?,
            Command::Open(position) => match self.app.click_entry(position - 1) {
                Some(_) => self.show_detail().await?,
                None => self.write(&format!("No blog at position {position}.\n"))?,
            },
            Command::New => return self.create().await,
            Command::Cancel => {
                let form = self.app.form_mut();
                let message = if !form.is_open() {
                    "Nothing to cancel.\n"
                } else if form.close() {
                    "Draft discarded.\n"
                } else {
                    "A submission is in progress.\n"
                };
                self.write(message)?;
            }
            Command::Refresh => {
                self.app.refresh();
                self.show_list().await?;
                if self.app.selected().is_some() {
                    self.show_detail().await?;
                }
            }
            Command::Help => self.write(render::HELP)?,
            Command::Quit => return Ok(ControlFlow::Break(())),
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Prompt for each field, then submit. Enter keeps the current value, so
    /// a failed draft can be corrected without retyping it. The pending label
    /// is printed once the request is on the wire.
    async fn create(&mut self) -> anyhow::Result<ControlFlow<()>> {
        self.app.form_mut().open();

        for field in Field::ALL {
            let current = field.value_mut(self.app.form_mut().draft_mut()).clone();
            let prompt = if current.is_empty() {
                format!("{}: ", field.label())
            } else {
                format!("{} [{current}]: ", field.label())
            };
            let Some(answer) = self.prompt(&prompt).await? else {
                return Ok(ControlFlow::Break(()));
            };
            if !answer.is_empty() {
                *field.value_mut(self.app.form_mut().draft_mut()) = answer;
            }
        }

        let mut updates = self.app.form().subscribe();
        let result = {
            let output = &mut self.output;
            let submit = self.app.form_mut().submit();
            tokio::pin!(submit);
            // The state borrow must not outlive the check, or the mutation
            // cannot publish its result.
            let pending = async { updates.wait_for(|state| state.is_pending()).await.is_ok() };
            tokio::select! {
                biased;
                result = &mut submit => result,
                true = pending => {
                    write_text(output, &render::submitting())?;
                    submit.await
                }
            }
        };

        match result {
            Ok(blog) => {
                self.write(&format!("Created \"{}\".\n", blog.title))?;
                self.show_list().await?;
            }
            Err(err) => {
                debug!(%err, "create failed");
                let text = render::form(self.app.form());
                self.write(&text)?;
                self.write(RETRY_HINT)?;
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    async fn show_list(&mut self) -> anyhow::Result<()> {
        self.app.settle().await;
        let text = render::list(&self.app.list_view());
        self.write(&text)
    }

    async fn show_detail(&mut self) -> anyhow::Result<()> {
        self.app.settle().await;
        let text = render::detail(&self.app.detail_view());
        self.write(&text)
    }

    /// `None` at end of input.
    async fn prompt(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        self.write(prompt)?;
        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn write(&mut self, text: &str) -> anyhow::Result<()> {
        write_text(&mut self.output, text)
    }
}

fn write_text(output: &mut impl Write, text: &str) -> anyhow::Result<()> {
    output.write_all(text.as_bytes())?;
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_aliases() {
        let cases = [
            ("list", Command::List),
            ("  open 3 ", Command::Open(3)),
            ("new", Command::New),
            ("cancel", Command::Cancel),
            ("refresh", Command::Refresh),
            ("?", Command::Help),
            ("exit", Command::Quit),
        ];
        for (line, expected) in cases {
            assert_eq!(line.parse::<Command>(), Ok(expected), "{line}");
        }
    }

    #[test]
    fn open_requires_a_positive_position() {
        for line in ["open", "open 0", "open x"] {
            let err = line.parse::<Command>().unwrap_err();
            assert!(err.starts_with("Usage: open <n>"), "{line}: {err}");
        }
    }

    #[test]
    fn rejects_unknown_and_extra_arguments() {
        assert_eq!(
            "delete 1".parse::<Command>(),
            Err("Unknown command `delete`. Type `help` for the list of commands.".to_string())
        );
        assert_eq!(
            "list all".parse::<Command>(),
            Err("`list` takes no extra arguments.".to_string())
        );
    }

    #[test]
    fn fields_cover_the_whole_draft() {
        let mut draft = BlogDraft::default();
        for field in Field::ALL {
            *field.value_mut(&mut draft) = field.label().to_string();
        }
        assert_eq!(draft.title, "Title");
        assert_eq!(draft.category_input, "Categories (comma separated)");
        assert_eq!(draft.description, "Description");
        assert_eq!(draft.cover_image, "Cover image URL");
        assert_eq!(draft.content, "Content");
    }
}
