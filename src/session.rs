use crate::document::MistakeLog;
use crate::segment::segment;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput,
    Completed,
}

/// Performance of a finished pass, handed to the document store
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub mistake_count: u32,
    pub hint_count: u32,
    pub session_mistakes: MistakeLog,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Line accepted; `line` is the 1-based number of the next line to recite
    Advanced { line: usize },
    /// Last line accepted. Returned exactly once per session.
    Completed(SessionSummary),
    /// Wrong attempt on the 1-based `line`. `logged` is false once that
    /// line's mistake log is full.
    Mismatch { line: usize, logged: bool },
    /// Nothing left to recite
    Rejected,
}

/// One practice pass over the lines of a reference text
#[derive(Debug, Clone, Default)]
pub struct Session {
    lines: Vec<String>,
    current: usize,
    correct_log: Vec<String>,
    pending: String,
    mistake_count: u32,
    hint_count: u32,
    hint_visible: bool,
    show_error: bool,
    mistakes: MistakeLog,
    keep_resolved_mistakes: bool,
}

impl Session {
    pub fn new(text: &str) -> Self {
        Self {
            lines: segment(text),
            ..Self::default()
        }
    }

    /// Keep a line's wrong attempts after it has been answered correctly
    pub fn keep_resolved_mistakes(mut self, keep: bool) -> Self {
        self.keep_resolved_mistakes = keep;
        self
    }

    pub fn state(&self) -> SessionState {
        if self.current >= self.lines.len() {
            SessionState::Completed
        } else {
            SessionState::AwaitingInput
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state() == SessionState::Completed
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 0-based index of the line being recited; equals `lines().len()` once complete
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// 1-based number of the line being recited
    pub fn current_line_number(&self) -> usize {
        self.current + 1
    }

    pub fn expected_line(&self) -> Option<&str> {
        self.lines.get(self.current).map(String::as_str)
    }

    pub fn correct_log(&self) -> &[String] {
        &self.correct_log
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn mistake_count(&self) -> u32 {
        self.mistake_count
    }

    pub fn hint_count(&self) -> u32 {
        self.hint_count
    }

    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    pub fn show_error(&self) -> bool {
        self.show_error
    }

    pub fn mistakes(&self) -> &MistakeLog {
        &self.mistakes
    }

    /// Replace the unsubmitted input
    pub fn edit(&mut self, raw: &str) {
        self.pending = raw.to_string();
        self.hint_visible = false;
    }

    /// Check the pending input against the current line
    pub fn submit_pending(&mut self) -> SubmitOutcome {
        let raw = self.pending.clone();
        self.submit(&raw)
    }

    /// Check `raw` against the current line. Surrounding whitespace is
    /// ignored on both sides; everything in between must match exactly.
    pub fn submit(&mut self, raw: &str) -> SubmitOutcome {
        let Some(expected) = self.lines.get(self.current) else {
            return SubmitOutcome::Rejected;
        };
        let line = self.current_line_number();

        if raw.trim() == expected.trim() {
            self.correct_log.push(raw.to_string());
            self.pending.clear();
            self.show_error = false;
            self.hint_visible = false;
            if !self.keep_resolved_mistakes {
                self.mistakes.clear_line(line);
            }
            self.current += 1;
            debug!(line, "line accepted");

            if self.is_completed() {
                debug!(
                    mistakes = self.mistake_count,
                    hints = self.hint_count,
                    "session completed"
                );
                SubmitOutcome::Completed(self.summary())
            } else {
                SubmitOutcome::Advanced {
                    line: self.current_line_number(),
                }
            }
        } else {
            self.show_error = true;
            self.mistake_count += 1;
            let logged = self.mistakes.record(line, raw);
            debug!(line, logged, "line rejected");
            SubmitOutcome::Mismatch { line, logged }
        }
    }

    /// Reveal the current line. Counted on every call.
    pub fn request_hint(&mut self) -> Option<&str> {
        let expected = self.lines.get(self.current)?;
        self.hint_visible = true;
        self.show_error = true;
        self.hint_count += 1;
        Some(expected.as_str())
    }

    /// Start over on the same lines
    pub fn reset_input(&mut self) {
        let lines = std::mem::take(&mut self.lines);
        *self = Self {
            lines,
            keep_resolved_mistakes: self.keep_resolved_mistakes,
            ..Self::default()
        };
    }

    /// Drop the lines as well
    pub fn reset_all(&mut self) {
        self.reset_input();
        self.lines.clear();
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            mistake_count: self.mistake_count,
            hint_count: self.hint_count,
            session_mistakes: self.mistakes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn new_session_awaits_first_line() {
        let session = Session::new("A\n\nB\nC");
        assert_eq!(session.lines(), ["A", "B", "C"]);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.state(), SessionState::AwaitingInput);
        assert_eq!(session.expected_line(), Some("A"));
    }

    #[test]
    fn walkthrough_with_one_mistake() {
        let mut session = Session::new("A\nB\nC");

        assert_eq!(session.submit("A"), SubmitOutcome::Advanced { line: 2 });
        assert_eq!(session.correct_log(), ["A"]);

        assert_eq!(
            session.submit("x"),
            SubmitOutcome::Mismatch { line: 2, logged: true }
        );
        assert!(session.show_error());
        assert_eq!(session.mistake_count(), 1);
        assert_eq!(session.mistakes().attempts(2), ["x"]);

        assert_eq!(session.submit("B"), SubmitOutcome::Advanced { line: 3 });
        assert!(!session.show_error());
        assert!(session.mistakes().attempts(2).is_empty());

        let summary = assert_matches!(session.submit("C"), SubmitOutcome::Completed(s) => s);
        assert_eq!(summary.mistake_count, 1);
        assert_eq!(summary.hint_count, 0);
        assert!(session.is_completed());
        assert_eq!(session.correct_log().len(), session.current_index());
    }

    #[test]
    fn comparison_trims_ends_only() {
        let mut session = Session::new("  to be  or not");
        assert_matches!(
            session.submit("to be or not"),
            SubmitOutcome::Mismatch { .. }
        );
        assert_matches!(session.submit("\tto be  or not   "), SubmitOutcome::Completed(_));
        assert_eq!(session.correct_log(), ["\tto be  or not   "]);
    }

    #[test]
    fn mistakes_per_line_are_capped() {
        let mut session = Session::new("right");
        for attempt in ["a", "b", "c"] {
            assert_matches!(session.submit(attempt), SubmitOutcome::Mismatch { logged: true, .. });
        }
        assert_matches!(session.submit("d"), SubmitOutcome::Mismatch { logged: false, .. });
        assert_matches!(session.submit("e"), SubmitOutcome::Mismatch { logged: false, .. });

        assert_eq!(session.mistake_count(), 5);
        assert_eq!(session.mistakes().attempts(1), ["a", "b", "c"]);
    }

    #[test]
    fn completion_is_reported_once() {
        let mut session = Session::new("only");
        assert_matches!(session.submit("only"), SubmitOutcome::Completed(_));
        assert_eq!(session.submit("only"), SubmitOutcome::Rejected);
        assert_eq!(session.submit("other"), SubmitOutcome::Rejected);
        assert_eq!(session.mistake_count(), 0);
    }

    #[test]
    fn empty_text_is_already_complete() {
        let mut session = Session::new("\n  \n");
        assert!(session.is_completed());
        assert_eq!(session.submit("anything"), SubmitOutcome::Rejected);
        assert_eq!(session.request_hint(), None);
        assert_eq!(session.mistake_count(), 0);
        assert_eq!(session.hint_count(), 0);
    }

    #[test]
    fn hints_count_every_request() {
        let mut session = Session::new("first\nsecond");
        assert_eq!(session.request_hint(), Some("first"));
        assert_eq!(session.request_hint(), Some("first"));
        assert_eq!(session.hint_count(), 2);
        assert!(session.hint_visible());
        assert!(session.show_error());
        assert_eq!(session.mistake_count(), 0);
    }

    #[test]
    fn editing_hides_hint() {
        let mut session = Session::new("first");
        session.request_hint();
        session.edit("fir");
        assert!(!session.hint_visible());
        assert_eq!(session.pending(), "fir");
        assert_eq!(session.hint_count(), 1);
    }

    #[test]
    fn submit_pending_uses_buffer() {
        let mut session = Session::new("first\nsecond");
        session.edit("first");
        assert_eq!(session.submit_pending(), SubmitOutcome::Advanced { line: 2 });
        assert_eq!(session.pending(), "");

        session.edit("wrong");
        assert_matches!(session.submit_pending(), SubmitOutcome::Mismatch { line: 2, .. });
        assert_eq!(session.pending(), "wrong");
    }

    #[test]
    fn reset_input_keeps_lines() {
        let mut session = Session::new("a\nb");
        session.submit("a");
        session.submit("nope");
        session.request_hint();

        session.reset_input();
        assert_eq!(session.lines(), ["a", "b"]);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.mistake_count(), 0);
        assert_eq!(session.hint_count(), 0);
        assert!(session.correct_log().is_empty());
        assert!(session.mistakes().is_empty());
        assert!(!session.show_error());
        assert!(!session.hint_visible());
    }

    #[test]
    fn reset_all_drops_lines() {
        let mut session = Session::new("a\nb");
        session.submit("a");
        session.reset_all();
        assert!(session.lines().is_empty());
        assert_eq!(session.current_index(), 0);
        assert!(session.correct_log().is_empty());
    }

    #[test]
    fn kept_mistakes_survive_correct_answer() {
        let mut session = Session::new("a\nb").keep_resolved_mistakes(true);
        session.submit("x");
        session.submit("a");
        let summary = assert_matches!(session.submit("b"), SubmitOutcome::Completed(s) => s);
        assert_eq!(summary.session_mistakes.attempts(1), ["x"]);

        session.reset_input();
        session.submit("y");
        session.submit("a");
        assert_eq!(session.mistakes().attempts(1), ["y"]);
    }
}
