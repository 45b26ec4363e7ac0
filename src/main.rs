use clap::{Parser, Subcommand};
use crossterm::tty::IsTty;
use recite::{
    config::{Backend, Config, ConfigStore, FileConfigStore},
    kv::KvStore,
    logging, report,
    runtime::{ReaderSource, Runner},
    store::DocumentStore,
    trainer::{Trainer, TrainerOptions},
    Error,
};
use std::{
    error::Error as StdError,
    fs,
    io::{self, Read},
    path::PathBuf,
};

/// line-by-line memorization trainer
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Memorize a text line by line: recite each line from memory, get it checked exactly, and keep a history of where you slip."
)]
pub struct Cli {
    /// where the document collection is stored (directory for json, file for sqlite)
    #[clap(long, global = true)]
    store: Option<PathBuf>,

    /// storage backend
    #[clap(long, value_enum, global = true)]
    backend: Option<Backend>,

    /// configuration file to read instead of the default one
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// disable colored output
    #[clap(long, global = true)]
    no_color: bool,

    #[clap(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Cmd {
    /// practice interactively (the default)
    Practice {
        /// saved document to practice
        #[clap(short, long, conflicts_with = "file")]
        doc: Option<String>,

        /// text file to practice
        #[clap(short, long)]
        file: Option<PathBuf>,
    },
    /// list saved documents with recent averages
    List,
    /// save text from a file or stdin as a document
    Save {
        name: String,

        /// read the text from this file instead of stdin
        #[clap(short, long)]
        file: Option<PathBuf>,
    },
    /// delete a saved document
    Delete { name: String },
    /// show the practice history of a document
    History {
        name: String,

        /// print CSV instead of text
        #[clap(long)]
        csv: bool,
    },
    /// show the effective configuration
    Config {
        /// write it to the configuration file
        #[clap(long)]
        save: bool,
    },
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    fn config(&self) -> Config {
        let mut cfg = self.config_store().load();
        if let Some(backend) = self.backend {
            cfg.backend = backend;
        }
        if let Some(store) = &self.store {
            cfg.store_path = Some(store.clone());
        }
        if self.no_color {
            cfg.color = false;
        }
        cfg
    }
}

fn open_store(cfg: &Config) -> recite::Result<DocumentStore<Box<dyn KvStore>>> {
    let kv = cfg.open_kv()?;
    tracing::info!(
        backend = %cfg.backend,
        path = %cfg.resolved_store_path().display(),
        "opening document store"
    );
    DocumentStore::open(kv)
}

fn main() -> Result<(), Box<dyn StdError>> {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("warning: logging disabled: {e}");
    }

    let cfg = cli.config();

    match cli.command.clone().unwrap_or(Cmd::Practice {
        doc: None,
        file: None,
    }) {
        Cmd::Practice { doc, file } => {
            let mut trainer = Trainer::new(open_store(&cfg)?, TrainerOptions::from(&cfg));
            let greeting = if let Some(name) = doc {
                trainer.on_load_requested(&name)
            } else if let Some(path) = file {
                trainer.on_text_changed(&fs::read_to_string(path)?)
            } else {
                Vec::new()
            };

            let stdout = io::stdout();
            let color = cfg.color && stdout.is_tty();
            let source = ReaderSource::new(io::stdin().lock());
            let mut runner = Runner::new(trainer, source, stdout.lock()).with_color(color);
            runner.run(greeting)?;
        }
        Cmd::List => {
            let store = open_store(&cfg)?;
            println!(
                "{}",
                report::format_document_list(store.documents(), chrono::Utc::now())
            );
        }
        Cmd::Save { name, file } => {
            let content = match file {
                Some(path) => fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let doc = open_store(&cfg)?.save(Some(&name), &content)?;
            println!("Saved '{}'.", doc.name);
        }
        Cmd::Delete { name } => match open_store(&cfg)?.delete(&name) {
            Ok(doc) => println!("Deleted '{}'.", doc.name),
            Err(Error::NotFound { name }) => eprintln!("No document named '{name}'."),
            Err(e) => return Err(e.into()),
        },
        Cmd::History { name, csv } => {
            let store = open_store(&cfg)?;
            let doc = store.load(&name)?;
            if csv {
                report::write_history_csv(doc, io::stdout().lock())?;
            } else {
                println!("{}", report::format_history(doc));
            }
        }
        Cmd::Config { save } => {
            println!("{}", serde_json::to_string_pretty(&cfg)?);
            if save {
                let config_store = cli.config_store();
                config_store.save(&cfg)?;
                println!("Wrote {}", config_store.path().display());
            }
        }
    }

    Ok(())
}
