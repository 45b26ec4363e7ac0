use assert_matches::assert_matches;
use recite::document::{StatsField, DEFAULT_AVERAGE_WINDOW};
use recite::kv::{MemoryKv, SqliteKv};
use recite::runtime::{Runner, ScriptSource};
use recite::store::DocumentStore;
use recite::trainer::{Notice, Trainer, TrainerOptions};

// Headless flow through the library surface without a terminal or binary.
#[test]
fn headless_walkthrough_records_stats() {
    let store = DocumentStore::open(MemoryKv::new()).unwrap();
    let mut trainer = Trainer::new(store, TrainerOptions::default());

    trainer.on_text_changed("A\nB\nC");
    assert_eq!(
        trainer.on_save_requested(Some("Doc1")).unwrap(),
        vec![Notice::Saved { name: "Doc1".into() }]
    );
    trainer.on_load_requested("Doc1");

    trainer.on_input_edited("A");
    assert_eq!(trainer.on_submit().unwrap(), vec![Notice::Advanced { line: 2 }]);
    assert_eq!(trainer.session().correct_log(), ["A"]);

    trainer.on_input_edited("x");
    assert_eq!(trainer.on_submit().unwrap(), vec![Notice::Mismatch { line: 2 }]);
    assert_eq!(trainer.session().mistakes().attempts(2), ["x"]);

    trainer.on_input_edited("B");
    trainer.on_submit().unwrap();
    assert!(trainer.session().mistakes().attempts(2).is_empty());

    trainer.on_input_edited("C");
    let notices = trainer.on_submit().unwrap();
    assert_matches!(
        notices.as_slice(),
        [Notice::Completed { summary, recorded_for: Some(_) }] if summary.mistake_count == 1
    );

    let doc = trainer.store().load("Doc1").unwrap();
    assert_eq!(doc.stats_history.len(), 1);
    assert_eq!(
        doc.recent_average(StatsField::MistakeCount, DEFAULT_AVERAGE_WINDOW),
        1.0
    );
}

#[test]
fn history_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("docs.db");

    {
        let store = DocumentStore::open(SqliteKv::open(&path).unwrap()).unwrap();
        let trainer = Trainer::new(store, TrainerOptions::default());
        let script = ScriptSource::new([
            ":paste", "line one", "line two", ".", ":save verse", ":load verse", "line one",
            "line tow", "line two",
        ]);
        let mut runner = Runner::new(trainer, script, Vec::new());
        runner.run(Vec::new()).unwrap();
        // runner drops here and flushes the store
    }

    let store = DocumentStore::open(SqliteKv::open(&path).unwrap()).unwrap();
    let doc = store.load("verse").unwrap();
    assert_eq!(doc.content, "line one\nline two");
    assert_eq!(doc.stats_history.len(), 1);
    assert_eq!(doc.stats_history[0].mistake_count, 1);
}

#[test]
fn history_is_capped_across_many_sessions() {
    let store = DocumentStore::open(MemoryKv::new()).unwrap();
    let mut trainer = Trainer::new(store, TrainerOptions::default());
    trainer.on_text_changed("only line");
    trainer.on_save_requested(Some("short")).unwrap();

    for round in 0..15u32 {
        trainer.on_load_requested("short");
        for _ in 0..round {
            trainer.on_attempt("wrong").unwrap();
        }
        trainer.on_attempt("only line").unwrap();
    }

    let history = &trainer.store().load("short").unwrap().stats_history;
    assert_eq!(history.len(), 10);
    assert_eq!(history[0].mistake_count, 14);
    assert_eq!(history[9].mistake_count, 5);
    let doc = trainer.store().load("short").unwrap();
    assert_eq!(doc.recent_average(StatsField::MistakeCount, 3), 13.0);
}
