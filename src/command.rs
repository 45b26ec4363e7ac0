/// One line of interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Anything that is not a `:` command is an attempt at the current line
    Attempt(String),
    Hint,
    Restart,
    Clear,
    Reverse,
    Swap,
    Save(Option<String>),
    Load(String),
    Delete(String),
    List,
    Report,
    History,
    Paste,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
Type a line and press Enter to check it. Commands:
  :hint            show the current line (counted)
  :restart         start the current text over
  :clear           drop the text and deselect the document
  :reverse         reverse the line order
  :swap            swap odd and even lines
  :paste           enter new text, finish with a line containing only '.'
  :save [name]     save the text as a document
  :load <name>     practice a saved document
  :delete <name>   delete a saved document
  :list            list saved documents
  :report          show this session's mistakes
  :history         show the selected document's history
  :help            show this help
  :quit            leave";

impl Command {
    pub fn parse(line: &str) -> Self {
        // "::" escapes a line that really starts with a colon
        let Some(rest) = line.trim_start().strip_prefix(':') else {
            return Command::Attempt(line.to_string());
        };
        if let Some(literal) = rest.strip_prefix(':') {
            return Command::Attempt(format!(":{literal}"));
        }

        let (word, arg) = match rest.trim().split_once(char::is_whitespace) {
            Some((word, arg)) => (word, Some(arg.trim().to_string())),
            None => (rest.trim(), None),
        };
        let arg = arg.filter(|a| !a.is_empty());

        match (word, arg) {
            ("hint" | "h", None) => Command::Hint,
            ("restart", None) => Command::Restart,
            ("clear", None) => Command::Clear,
            ("reverse", None) => Command::Reverse,
            ("swap", None) => Command::Swap,
            ("save", name) => Command::Save(name),
            ("load", Some(name)) => Command::Load(name),
            ("delete", Some(name)) => Command::Delete(name),
            ("list" | "ls", None) => Command::List,
            ("report", None) => Command::Report,
            ("history", None) => Command::History,
            ("paste", None) => Command::Paste,
            ("help" | "?", None) => Command::Help,
            ("quit" | "q" | "exit", None) => Command::Quit,
            _ => Command::Unknown(line.trim().to_string()),
        }
    }
}
