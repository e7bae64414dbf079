//! The edit / decide loop of a review
//!
//! ```text
//!            ┌──────────────── e, other input ───────────────┐
//!            ▼                                                │
//!   edit ─► decode ──(error)─► "edit again?" ─ q/EOF ─► Abandoned
//!            │                                                │
//!            └─ ok ─► menu ─ y/a/r/d ─► Submit(request)       │
//!                      │   s ─► Saved(path)                   │
//!                      │   p, ? ─► menu again                 │
//!                      └── q/EOF ─► Abandoned ────────────────┘
//! ```

use crate::draft::DraftStore;
use crate::editor::Editor;
use anyhow::{Context, Result};
use gh_review_template::{parse_template, ReviewOutcome, ReviewRequest};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const MENU_PROMPT: &str = "Submit this review [y,a,r,d,s,p,e,q,?]? ";
pub const EDIT_AGAIN_PROMPT: &str = "edit again? [Y]/q ";

const HELP: &str = "\
y - submit comments
a - submit and approve
r - submit and request changes
d - submit as a pending review (visible only to you)
s - save the review locally and quit; resume with --resume
p - preview the review
e - edit the review again
q - quit and abandon the review
? - print help";

/// One answer to the submit menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Submit(ReviewOutcome),
    Save,
    Preview,
    Edit,
    Quit,
    Help,
}

impl MenuChoice {
    /// Anything unrecognised means "edit again".
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "y" => MenuChoice::Submit(ReviewOutcome::Comment),
            "a" => MenuChoice::Submit(ReviewOutcome::Approve),
            "r" => MenuChoice::Submit(ReviewOutcome::RequestChanges),
            "d" => MenuChoice::Submit(ReviewOutcome::Pending),
            "s" => MenuChoice::Save,
            "p" => MenuChoice::Preview,
            "q" => MenuChoice::Quit,
            "?" => MenuChoice::Help,
            _ => MenuChoice::Edit,
        }
    }
}

/// Line-oriented conversation with the user.
pub trait Prompt {
    /// Show `question` and read one answer; `None` at end of input.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>>;

    fn say(&mut self, text: &str);
}

/// Prompt on stdout, answers from stdin.
#[derive(Debug, Default)]
pub struct StdPrompt;

impl Prompt for StdPrompt {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", question)?;
        stdout.flush()?;

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer)? == 0 {
            return Ok(None);
        }
        Ok(Some(answer))
    }

    fn say(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// The template on disk while it is being edited. Removed on drop.
#[derive(Debug)]
pub struct ReviewDocument {
    file: NamedTempFile,
}

impl ReviewDocument {
    pub fn create(contents: &str) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("gh-review-edit-")
            .suffix(".diff")
            .tempfile()
            .context("Failed to create review file")?;
        file.write_all(contents.as_bytes())
            .context("Failed to write review file")?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn read(&self) -> Result<String> {
        std::fs::read_to_string(self.path())
            .with_context(|| format!("Failed to read {}", self.path().display()))
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Send this request; its outcome is set
    Submit(ReviewRequest),
    /// The document was saved as a draft at this path
    Saved(PathBuf),
    Abandoned,
}

pub struct ReviewSession<'a, E: Editor, P: Prompt> {
    editor: &'a E,
    prompt: &'a mut P,
    drafts: &'a DraftStore,
    number: u64,
}

impl<'a, E: Editor, P: Prompt> ReviewSession<'a, E, P> {
    pub fn new(editor: &'a E, prompt: &'a mut P, drafts: &'a DraftStore, number: u64) -> Self {
        Self {
            editor,
            prompt,
            drafts,
            number,
        }
    }

    pub fn run(&mut self, document: &ReviewDocument) -> Result<SessionOutcome> {
        loop {
            let Some(request) = self.edit_until_parsed(document)? else {
                return Ok(SessionOutcome::Abandoned);
            };

            loop {
                let Some(answer) = self.prompt.ask(MENU_PROMPT)? else {
                    return Ok(SessionOutcome::Abandoned);
                };

                match MenuChoice::parse(&answer) {
                    MenuChoice::Submit(outcome) => {
                        return Ok(SessionOutcome::Submit(ReviewRequest {
                            outcome: Some(outcome),
                            ..request
                        }));
                    }
                    MenuChoice::Save => {
                        let path = self.drafts.save(self.number, &document.read()?)?;
                        return Ok(SessionOutcome::Saved(path));
                    }
                    MenuChoice::Preview => self.prompt.say(&request.to_string()),
                    MenuChoice::Help => self.prompt.say(HELP),
                    MenuChoice::Quit => return Ok(SessionOutcome::Abandoned),
                    MenuChoice::Edit => break,
                }
            }
        }
    }

    /// Edit and decode until the document parses. `None` when the user gives up.
    fn edit_until_parsed(&mut self, document: &ReviewDocument) -> Result<Option<ReviewRequest>> {
        loop {
            let parsed = self
                .editor
                .edit(document.path())
                .and_then(|()| document.read())
                .and_then(|text| parse_template(&text).map_err(Into::into));

            let err = match parsed {
                Ok(request) => return Ok(Some(request)),
                Err(err) => err,
            };

            log::warn!("Review file rejected: {:#}", err);
            self.prompt.say(&format!("error parsing file: {:#}", err));
            match self.prompt.ask(EDIT_AGAIN_PROMPT)? {
                Some(answer) if answer.trim().eq_ignore_ascii_case("q") => return Ok(None),
                Some(_) => {}
                None => return Ok(None),
            }
        }
    }
}
