use assert_cmd::Command;
use cloud::CloudOptions;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use wordstat::import::import_path;
use wordstat::{compute_tfidf, count_words, render_clouds, repoint, top_words_report, OutputFormat};
use wordstat_core::{CorpusStore, Normalizer, SledStore, UNATTRIBUTED};

const DUMP: &str = r#"{"id":"1","chat_id":"$chat","from":{"id":"$u1","print_name":"Ann"},"text":"cat cat dog"}
{"id":"2","chat_id":"$chat","from":{"id":"$u2","print_name":"Bob"},"text":"dog rust https://rust-lang.org"}
{"id":"3","chat_id":"$chat","media":{"caption":"dog photo"}}
{"id":"4","chat_id":"$other","from":{"id":"$u3","print_name":"Cy"},"text":"tea"}
{"id":"5","chat_id":"$chat","from":{"id":"$u4","print_name":"Dee"},"media":{"caption":""}}
"#;

fn write_dump(dir: &Path) -> std::path::PathBuf {
    let dumps = dir.join("dumps");
    fs::create_dir_all(&dumps).unwrap();
    fs::write(dumps.join("chat.jsonl"), DUMP).unwrap();
    fs::write(dumps.join("notes.txt"), "not a dump").unwrap();
    dumps
}

#[test]
fn pipeline_from_dump_to_report() {
    let dir = tempdir().unwrap();
    let dumps = write_dump(dir.path());
    let store = SledStore::open(dir.path().join("db")).unwrap();

    let stats = import_path(&store, &dumps, None).unwrap();
    assert_eq!(stats.files, 1);
    assert_eq!(stats.messages, 5);
    assert_eq!(stats.skipped, 0);

    let stat = count_words(&store, &Normalizer::default(), "$chat").unwrap();
    assert_eq!(stat.user_count(), 3);
    assert!(stat.user("$u4").is_none());
    assert_eq!(stat.user(UNATTRIBUTED).unwrap().get("dog"), 1);
    assert_eq!(stat.all().get("dog"), 3);

    let table = compute_tfidf(&store, "$chat").unwrap();
    assert_eq!(table.score("$u1", "dog"), Some(0.0));
    assert!((table.score("$u1", "cat").unwrap() - 2.0 / 3.0 * 3f64.ln()).abs() < 1e-12);

    let text = top_words_report(&store, "$chat", 1, OutputFormat::Human).unwrap();
    let ann = text.find("Ann").unwrap();
    let bob = text.find("Bob").unwrap();
    assert!(ann < bob);
    assert!(text.contains("(unattributed)"));
    assert!(text.contains("cat "));
    assert!(!text.contains("dog "));

    let json = top_words_report(&store, "$chat", 10, OutputFormat::Json).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[0]["user_id"], "$u1");
    assert_eq!(parsed[0]["terms"][0]["term"], "cat");

    let out = dir.path().join("output");
    let written = render_clouds(&store, "$chat", &out, &CloudOptions { size: 80, ..CloudOptions::default() }).unwrap();
    assert_eq!(written.len(), 4);
    assert!(out.join("all.png").is_file());
    assert!(out.join("error.png").is_file());
}

#[test]
fn commands_out_of_order_fail() {
    let store = SledStore::temporary().unwrap();
    let err = compute_tfidf(&store, "$chat").unwrap_err();
    assert!(err.to_string().contains("run `count` first"));
    let err = top_words_report(&store, "$chat", 10, OutputFormat::Human).unwrap_err();
    assert!(err.to_string().contains("run `tf-idf` first"));
}

#[test]
fn recount_replaces_previous_counters() {
    let dir = tempdir().unwrap();
    let dumps = write_dump(dir.path());
    let store = SledStore::open(dir.path().join("db")).unwrap();
    import_path(&store, &dumps, None).unwrap();
    let n = Normalizer::default();
    let first = count_words(&store, &n, "$chat").unwrap();
    count_words(&store, &n, "$chat").unwrap();
    assert_eq!(store.get_counters("$chat").unwrap().unwrap(), first);
}

#[test]
fn repointed_messages_are_counted_under_new_chat() {
    let dir = tempdir().unwrap();
    let dumps = write_dump(dir.path());
    let store = SledStore::open(dir.path().join("db")).unwrap();
    import_path(&store, &dumps, None).unwrap();
    assert_eq!(repoint(&store, "$other", "$chat").unwrap(), 1);
    let stat = count_words(&store, &Normalizer::default(), "$chat").unwrap();
    assert_eq!(stat.user("$u3").unwrap().get("tea"), 1);
}

#[test]
fn records_without_chat_use_fallback_or_are_skipped() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("loose.json");
    fs::write(&file, r#"[{"id":"a","from":{"id":"$u1"},"text":"cat"},{"id":"b","text":"dog"}]"#).unwrap();

    let store = SledStore::temporary().unwrap();
    let stats = import_path(&store, &file, None).unwrap();
    assert_eq!((stats.messages, stats.skipped), (0, 2));

    let stats = import_path(&store, &file, Some("$loose")).unwrap();
    assert_eq!(stats.messages, 2);
    assert_eq!(store.message_count("$loose").unwrap(), 2);
}

#[test]
fn cli_runs_the_whole_sequence() {
    let dir = tempdir().unwrap();
    let dumps = write_dump(dir.path());
    let db = dir.path().join("db");
    let out = dir.path().join("clouds");

    let run = |args: &[&str]| {
        let mut cmd = Command::cargo_bin("wordstat").unwrap();
        cmd.arg("--db").arg(&db).args(args);
        cmd
    };

    run(&["import", "--input", dumps.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("imported 5 messages"));
    run(&["count", "--chat-id", "$chat"]).assert().success();
    run(&["tf-idf", "--chat-id", "$chat"]).assert().success();
    run(&["top-words", "--chat-id", "$chat", "-n", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ann").and(predicate::str::contains("Bob")));
    run(&["cloud", "--chat-id", "$chat", "--output", out.to_str().unwrap(), "--size", "64"])
        .env_remove("WORDSTAT_FONT")
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote 4 images").and(predicate::str::contains("drawn as tiles")));
    run(&["top-words", "--chat-id", "$nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("run `tf-idf` first"));
}
