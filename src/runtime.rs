use crate::command::{Command, HELP};
use crate::error::Result;
use crate::kv::KvStore;
use crate::report;
use crate::session::SessionState;
use crate::trainer::{Notice, Trainer};
use chrono::Utc;
use crossterm::style::{style, Color, Stylize};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Line that ends `:paste` input
const PASTE_TERMINATOR: &str = ".";

/// Source of user input lines
pub trait LineSource {
    /// Next line without its line ending, or None once input is exhausted
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Production source reading from a buffered reader such as stdin
pub struct ReaderSource<R: BufRead> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(Some(buf))
    }
}

/// Scripted source for tests
pub struct ScriptSource {
    lines: VecDeque<String>,
}

impl ScriptSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for ScriptSource {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Quit,
}

/// Drives a [`Trainer`] one input line at a time
pub struct Runner<K: KvStore, S: LineSource, W: Write> {
    trainer: Trainer<K>,
    source: S,
    out: W,
    color: bool,
}

impl<K: KvStore, S: LineSource, W: Write> Runner<K, S, W> {
    pub fn new(trainer: Trainer<K>, source: S, out: W) -> Self {
        Self {
            trainer,
            source,
            out,
            color: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn trainer(&self) -> &Trainer<K> {
        &self.trainer
    }

    /// Hand back the trainer and output; dropping the trainer flushes its store
    pub fn into_parts(self) -> (Trainer<K>, W) {
        (self.trainer, self.out)
    }

    /// Greet, then process lines until `:quit` or end of input
    pub fn run(&mut self, greeting: Vec<Notice>) -> Result<()> {
        let hello = self.paint("Type :help for commands.", Color::DarkGrey);
        writeln!(self.out, "{hello}")?;
        self.show(&greeting)?;
        self.prompt()?;
        while self.step()? == Step::Continue {
            self.prompt()?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Read and handle one line
    pub fn step(&mut self) -> Result<Step> {
        let Some(line) = self.source.next_line()? else {
            return Ok(Step::Quit);
        };

        let notices = match Command::parse(&line) {
            Command::Attempt(raw) => self.trainer.on_attempt(&raw)?,
            Command::Hint => self.trainer.on_hint_requested(),
            Command::Restart => self.trainer.on_reset_input(),
            Command::Clear => self.trainer.on_reset_all(),
            Command::Reverse => self.trainer.on_reverse_requested(),
            Command::Swap => self.trainer.on_swap_requested(),
            Command::Save(name) => self.trainer.on_save_requested(name.as_deref())?,
            Command::Load(name) => self.trainer.on_load_requested(&name),
            Command::Delete(name) => self.trainer.on_delete_requested(&name)?,
            Command::Paste => {
                let text = self.read_paste()?;
                self.trainer.on_text_changed(&text)
            }
            Command::List => {
                self.trainer.refresh_store()?;
                let listing =
                    report::format_document_list(self.trainer.store().documents(), Utc::now());
                writeln!(self.out, "{listing}")?;
                Vec::new()
            }
            Command::Report => {
                let session = self.trainer.session();
                let text = report::format_mistakes(session.mistakes(), session.lines());
                writeln!(self.out, "{text}")?;
                Vec::new()
            }
            Command::History => {
                self.trainer.refresh_store()?;
                let text = match self.trainer.selected_document() {
                    Some(doc) => report::format_history(doc),
                    None => "Load a document first.".to_string(),
                };
                writeln!(self.out, "{text}")?;
                Vec::new()
            }
            Command::Help => {
                writeln!(self.out, "{HELP}")?;
                Vec::new()
            }
            Command::Quit => return Ok(Step::Quit),
            Command::Unknown(raw) => {
                let msg = format!("Unknown command {raw}. Type :help for commands.");
                let msg = self.paint(&msg, Color::Yellow);
                writeln!(self.out, "{msg}")?;
                Vec::new()
            }
        };

        self.show(&notices)?;
        Ok(Step::Continue)
    }

    fn read_paste(&mut self) -> Result<String> {
        writeln!(
            self.out,
            "Enter the text to memorize. Finish with a line containing only '{PASTE_TERMINATOR}'."
        )?;
        self.out.flush()?;
        let mut lines = Vec::new();
        while let Some(line) = self.source.next_line()? {
            if line == PASTE_TERMINATOR {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }

    fn prompt(&mut self) -> Result<()> {
        let session = self.trainer.session();
        if session.state() == SessionState::AwaitingInput {
            let prompt = format!(
                "[{}/{}] > ",
                session.current_line_number(),
                session.lines().len()
            );
            let prompt = self.paint(&prompt, Color::Cyan);
            write!(self.out, "{prompt}")?;
        } else {
            write!(self.out, "> ")?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn show(&mut self, notices: &[Notice]) -> Result<()> {
        for notice in notices {
            let (text, color) = describe(notice);
            let text = self.paint(&text, color);
            writeln!(self.out, "{text}")?;
        }
        Ok(())
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }
}

fn describe(notice: &Notice) -> (String, Color) {
    match notice {
        Notice::TextChanged { lines } => (format!("New text with {lines} lines."), Color::Reset),
        Notice::Advanced { line } => (format!("Correct. On to line {line}."), Color::Green),
        Notice::Mismatch { line } => (
            format!("Not quite. Try line {line} again."),
            Color::Red,
        ),
        Notice::Completed {
            summary,
            recorded_for,
        } => {
            let mut text = format!(
                "Congratulations, all lines done! Mistakes: {}, hints: {}.",
                summary.mistake_count, summary.hint_count
            );
            if let Some(name) = recorded_for {
                text.push_str(&format!(" Recorded in the history of '{name}'."));
            }
            text.push_str(" Type :report for your mistakes.");
            (text, Color::Green)
        }
        Notice::Hint { line, expected } => (format!("Line {line}: {expected}"), Color::Magenta),
        Notice::Advisory(advisory) => (
            format!(
                "Careful: line {} went wrong in {} recent session(s).",
                advisory.line, advisory.occurrences
            ),
            Color::Yellow,
        ),
        Notice::Reset => ("Session reset.".to_string(), Color::Reset),
        Notice::Saved { name } => (format!("Saved '{name}'."), Color::Green),
        Notice::Loaded { name, lines } => {
            (format!("Loaded '{name}' with {lines} lines."), Color::Reset)
        }
        Notice::Deleted { name } => (format!("Deleted '{name}'."), Color::Reset),
        Notice::Missing { name } => (format!("No document named '{name}'."), Color::Yellow),
        Notice::Rejected { limit } => (
            format!("Cannot save: the limit of {limit} documents is reached."),
            Color::Red,
        ),
        Notice::Idle => (
            "Nothing to recite. Use :paste or :load <name>.".to_string(),
            Color::DarkGrey,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKv;
    use crate::store::DocumentStore;
    use crate::trainer::TrainerOptions;

    fn runner(script: &[&str]) -> Runner<MemoryKv, ScriptSource, Vec<u8>> {
        let store = DocumentStore::open(MemoryKv::new()).unwrap();
        let trainer = Trainer::new(store, TrainerOptions::default());
        Runner::new(trainer, ScriptSource::new(script.iter().copied()), Vec::new())
    }

    fn output(runner: Runner<MemoryKv, ScriptSource, Vec<u8>>) -> String {
        let (_, out) = runner.into_parts();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn reader_source_strips_line_endings() {
        let mut source = ReaderSource::new(io::Cursor::new("one\r\ntwo\nthree"));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("one"));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("two"));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("three"));
        assert_eq!(source.next_line().unwrap(), None);
    }

    #[test]
    fn step_quits_at_end_of_input() {
        let mut runner = runner(&[]);
        assert_eq!(runner.step().unwrap(), Step::Quit);
    }

    #[test]
    fn paste_then_recite() {
        let mut runner = runner(&[":paste", "A", "", "B", ".", "A", "b", "B", ":report"]);
        runner.run(Vec::new()).unwrap();

        assert!(runner.trainer().session().is_completed());
        let out = output(runner);
        assert!(out.contains("New text with 2 lines."));
        assert!(out.contains("Correct. On to line 2."));
        assert!(out.contains("Not quite. Try line 2 again."));
        assert!(out.contains("Mistakes: 1, hints: 0."));
        assert!(out.contains("No mistakes recorded."));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn save_load_and_history() {
        let mut runner = runner(&[
            ":paste", "first", "second", ".", ":save poem", ":load poem", "first", ":hint",
            "second", ":history", ":list",
        ]);
        runner.run(Vec::new()).unwrap();

        let doc = runner.trainer().store().load("poem").unwrap();
        assert_eq!(doc.stats_history.len(), 1);
        assert_eq!(doc.stats_history[0].hint_count, 1);

        let out = output(runner);
        assert!(out.contains("Saved 'poem'."));
        assert!(out.contains("Loaded 'poem' with 2 lines."));
        assert!(out.contains("Line 2: second"));
        assert!(out.contains("Recorded in the history of 'poem'."));
        assert!(out.contains("Round 1 - "));
        assert!(out.contains(" 1. poem (created "));
    }

    #[test]
    fn quit_stops_processing() {
        let mut runner = runner(&[":paste", "a", ".", ":quit", "a"]);
        runner.run(Vec::new()).unwrap();
        assert!(!runner.trainer().session().is_completed());
    }

    #[test]
    fn unknown_and_missing() {
        let mut runner = runner(&[":bogus", ":load nothing", "typed into the void"]);
        runner.run(Vec::new()).unwrap();
        let out = output(runner);
        assert!(out.contains("Unknown command :bogus."));
        assert!(out.contains("No document named 'nothing'."));
        assert!(out.contains("Nothing to recite."));
    }

    #[test]
    fn colored_output_keeps_text() {
        let mut runner = runner(&[":paste", "a", "."]).with_color(true);
        runner.run(Vec::new()).unwrap();
        let out = output(runner);
        assert!(out.contains("New text with 1 lines."));
    }
}
