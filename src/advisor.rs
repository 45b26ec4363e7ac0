use crate::document::Document;
use crate::session::Session;

/// Warning that the line about to be recited went wrong in earlier sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advisory {
    /// 1-based line number
    pub line: usize,
    /// Number of past sessions with logged mistakes on this line
    pub occurrences: usize,
}

/// Look up the session's current line in the document's history.
pub fn advise(document: &Document, session: &Session) -> Option<Advisory> {
    if session.is_completed() {
        return None;
    }
    let line = session.current_line_number();
    match document.mistake_frequency(line) {
        0 => None,
        occurrences => Some(Advisory { line, occurrences }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{MistakeLog, StatsRecord};

    fn doc_with_mistakes_on(lines_per_record: &[&[usize]]) -> Document {
        let mut doc = Document::new("poem", "a\nb\nc");
        for lines in lines_per_record {
            let mut log = MistakeLog::new();
            for line in *lines {
                log.record(*line, "wrong");
            }
            doc.stats_history.push(StatsRecord::new(lines.len() as u32, 0, log));
        }
        doc
    }

    #[test]
    fn warns_about_repeat_offender() {
        let doc = doc_with_mistakes_on(&[&[1, 2], &[2], &[3]]);
        let mut session = Session::new(&doc.content);
        assert_eq!(advise(&doc, &session), Some(Advisory { line: 1, occurrences: 1 }));

        session.submit("a");
        assert_eq!(advise(&doc, &session), Some(Advisory { line: 2, occurrences: 2 }));
    }

    #[test]
    fn silent_for_clean_lines() {
        let doc = doc_with_mistakes_on(&[&[3], &[]]);
        let session = Session::new(&doc.content);
        assert_eq!(advise(&doc, &session), None);
    }

    #[test]
    fn silent_once_completed() {
        let doc = doc_with_mistakes_on(&[&[4]]);
        let mut session = Session::new(&doc.content);
        for line in ["a", "b", "c"] {
            session.submit(line);
        }
        assert!(session.is_completed());
        assert_eq!(advise(&doc, &session), None);
    }

    #[test]
    fn silent_without_history() {
        let doc = Document::new("fresh", "a");
        let session = Session::new(&doc.content);
        assert_eq!(advise(&doc, &session), None);
    }
}
