use crate::advisor::{advise, Advisory};
use crate::document::{Document, StatsRecord};
use crate::error::{Error, Result};
use crate::kv::KvStore;
use crate::segment;
use crate::session::{Session, SessionSummary, SubmitOutcome};
use crate::store::DocumentStore;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainerOptions {
    pub advisories: bool,
    pub keep_resolved_mistakes: bool,
}

impl Default for TrainerOptions {
    fn default() -> Self {
        Self {
            advisories: true,
            keep_resolved_mistakes: false,
        }
    }
}

impl From<&crate::config::Config> for TrainerOptions {
    fn from(cfg: &crate::config::Config) -> Self {
        Self {
            advisories: cfg.advisories,
            keep_resolved_mistakes: cfg.keep_resolved_mistakes,
        }
    }
}

/// Something the front end should tell the user about
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// New text loaded with this many practice lines
    TextChanged { lines: usize },
    Advanced { line: usize },
    Mismatch { line: usize },
    Completed {
        summary: SessionSummary,
        /// Document the stats were recorded for
        recorded_for: Option<String>,
    },
    Hint { line: usize, expected: String },
    Advisory(Advisory),
    Reset,
    Saved { name: String },
    Loaded { name: String, lines: usize },
    Deleted { name: String },
    /// Load or delete of a name that is not stored
    Missing { name: String },
    /// Save refused because the collection is full
    Rejected { limit: usize },
    /// Nothing to recite
    Idle,
}

/// Ties the practice session to the document store.
///
/// Each `on_*` handler corresponds to one user action and returns what
/// happened. Store failures other than capacity and missing names are
/// returned as errors.
#[derive(Debug)]
pub struct Trainer<K: KvStore> {
    store: DocumentStore<K>,
    options: TrainerOptions,
    text: String,
    session: Session,
    selected: Option<String>,
}

impl<K: KvStore> Trainer<K> {
    pub fn new(store: DocumentStore<K>, options: TrainerOptions) -> Self {
        Self {
            store,
            options,
            text: String::new(),
            session: Session::default(),
            selected: None,
        }
    }

    pub fn store(&self) -> &DocumentStore<K> {
        &self.store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_document(&self) -> Option<&Document> {
        self.selected.as_deref().and_then(|name| self.store.get(name))
    }

    /// Pick up documents saved by other processes since the store was opened
    pub fn refresh_store(&mut self) -> Result<()> {
        self.store.reload()
    }

    pub fn on_text_changed(&mut self, text: &str) -> Vec<Notice> {
        self.replace_text(text.to_string());
        let mut notices = vec![Notice::TextChanged {
            lines: self.session.lines().len(),
        }];
        notices.extend(self.advisory());
        notices
    }

    pub fn on_input_edited(&mut self, raw: &str) {
        self.session.edit(raw);
    }

    /// Check the pending input against the current line
    pub fn on_submit(&mut self) -> Result<Vec<Notice>> {
        let outcome = self.session.submit_pending();
        self.handle_outcome(outcome)
    }

    /// Edit and submit in one step
    pub fn on_attempt(&mut self, raw: &str) -> Result<Vec<Notice>> {
        self.session.edit(raw);
        self.on_submit()
    }

    pub fn on_hint_requested(&mut self) -> Vec<Notice> {
        let line = self.session.current_line_number();
        match self.session.request_hint() {
            Some(expected) => vec![Notice::Hint {
                line,
                expected: expected.to_string(),
            }],
            None => vec![Notice::Idle],
        }
    }

    pub fn on_reset_input(&mut self) -> Vec<Notice> {
        self.session.reset_input();
        let mut notices = vec![Notice::Reset];
        notices.extend(self.advisory());
        notices
    }

    pub fn on_reset_all(&mut self) -> Vec<Notice> {
        self.text.clear();
        self.session.reset_all();
        self.selected = None;
        vec![Notice::Reset]
    }

    pub fn on_reverse_requested(&mut self) -> Vec<Notice> {
        let reversed = segment::reverse(&self.text);
        self.on_text_changed(&reversed)
    }

    pub fn on_swap_requested(&mut self) -> Vec<Notice> {
        let swapped = segment::swap_odd_even(&self.text);
        self.on_text_changed(&swapped)
    }

    /// Save the active text as a new document
    pub fn on_save_requested(&mut self, name: Option<&str>) -> Result<Vec<Notice>> {
        match self.store.save(name, &self.text) {
            Ok(doc) => Ok(vec![Notice::Saved { name: doc.name }]),
            Err(Error::CapacityExceeded { limit }) => Ok(vec![Notice::Rejected { limit }]),
            Err(e) => Err(e),
        }
    }

    /// Practice a stored document and record completed sessions against it
    pub fn on_load_requested(&mut self, name: &str) -> Vec<Notice> {
        if let Err(e) = self.store.reload() {
            warn!("could not re-read documents before loading '{name}': {e}");
        }
        let content = match self.store.load(name) {
            Ok(doc) => doc.content.clone(),
            Err(_) => {
                return vec![Notice::Missing {
                    name: name.to_string(),
                }]
            }
        };
        self.replace_text(content);
        self.selected = Some(name.to_string());
        let mut notices = vec![Notice::Loaded {
            name: name.to_string(),
            lines: self.session.lines().len(),
        }];
        notices.extend(self.advisory());
        notices
    }

    /// Remove a stored document. The active text and selection stay as they
    /// are; later completions for a deleted document are not recorded.
    pub fn on_delete_requested(&mut self, name: &str) -> Result<Vec<Notice>> {
        match self.store.delete(name) {
            Ok(doc) => Ok(vec![Notice::Deleted { name: doc.name }]),
            Err(Error::NotFound { name }) => Ok(vec![Notice::Missing { name }]),
            Err(e) => Err(e),
        }
    }

    fn replace_text(&mut self, text: String) {
        self.session = Session::new(&text).keep_resolved_mistakes(self.options.keep_resolved_mistakes);
        self.text = text;
        debug!(lines = self.session.lines().len(), "session restarted on new text");
    }

    fn handle_outcome(&mut self, outcome: SubmitOutcome) -> Result<Vec<Notice>> {
        let notices = match outcome {
            SubmitOutcome::Advanced { line } => {
                let mut notices = vec![Notice::Advanced { line }];
                notices.extend(self.advisory());
                notices
            }
            SubmitOutcome::Mismatch { line, .. } => vec![Notice::Mismatch { line }],
            SubmitOutcome::Completed(summary) => {
                let recorded_for = self.record(&summary)?;
                vec![Notice::Completed {
                    summary,
                    recorded_for,
                }]
            }
            SubmitOutcome::Rejected => vec![Notice::Idle],
        };
        Ok(notices)
    }

    fn record(&mut self, summary: &SessionSummary) -> Result<Option<String>> {
        let Some(name) = self.selected.clone() else {
            return Ok(None);
        };
        let record = StatsRecord::new(
            summary.mistake_count,
            summary.hint_count,
            summary.session_mistakes.clone(),
        );
        match self.store.append_stats(&name, record) {
            Ok(()) => Ok(Some(name)),
            Err(Error::NotFound { .. }) => {
                warn!(name, "selected document no longer stored; stats dropped");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn advisory(&self) -> Option<Notice> {
        if !self.options.advisories {
            return None;
        }
        let doc = self.selected_document()?;
        advise(doc, &self.session).map(Notice::Advisory)
    }
}
