use geminichat::{ArchiveName, HistoryRepository, JsonFileHistoryRepository, Message};
use tempfile::tempdir;

#[tokio::test]
async fn json_history_roundtrip_preserves_order_and_roles() {
    let dir = tempdir().expect("tempdir");
    let repo = JsonFileHistoryRepository::new(dir.path());

    let history = vec![
        Message::user("Hello"),
        Message::model("Hi there"),
        Message::user("multi\nline \"quoted\" text"),
        Message::model("Error: timeout"),
    ];
    repo.save(&history).await.expect("save");

    let loaded = repo.load().await.expect("load");
    assert_eq!(loaded, history);
}

#[tokio::test]
async fn json_history_load_without_file_is_empty() {
    let dir = tempdir().expect("tempdir");
    let repo = JsonFileHistoryRepository::new(dir.path().join("never-created"));

    assert!(repo.load().await.expect("load").is_empty());
    assert!(repo.load().await.expect("load again").is_empty());
}

#[tokio::test]
async fn json_history_reads_files_written_by_other_tools() {
    let dir = tempdir().expect("tempdir");
    let repo = JsonFileHistoryRepository::new(dir.path());
    std::fs::write(
        repo.path(),
        r#"[{"role":"user","text":"ping"},{"role":"model","text":"pong"}]"#,
    )
    .expect("write");

    let loaded = repo.load().await.expect("load");
    assert_eq!(loaded, vec![Message::user("ping"), Message::model("pong")]);
}

#[tokio::test]
async fn json_history_save_overwrites_previous_content() {
    let dir = tempdir().expect("tempdir");
    let repo = JsonFileHistoryRepository::new(dir.path());

    repo.save(&[Message::user("a"), Message::model("b")])
        .await
        .expect("save");
    repo.save(&[Message::user("c")]).await.expect("save");

    assert_eq!(repo.load().await.expect("load"), vec![Message::user("c")]);
}

#[tokio::test]
async fn json_history_archive_is_sibling_of_active_file() {
    let dir = tempdir().expect("tempdir");
    let repo = JsonFileHistoryRepository::new(dir.path());
    repo.save(&[Message::user("keep")]).await.expect("save");

    let name = ArchiveName::now();
    let file_name = repo.archive(&name).await.expect("archive");

    assert_eq!(file_name, name.file_name());
    assert!(dir.path().join(&file_name).is_file());
    assert!(!repo.path().exists());
    assert!(repo.load().await.expect("load").is_empty());
}
