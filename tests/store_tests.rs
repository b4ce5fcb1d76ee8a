// tests/store_tests.rs

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::Utc;
use enrollment::{
    error::StoreError,
    models::student::{PersonalInfo, TestResult},
    store::RecordStore,
};
use validator::Validate;

fn temp_file() -> PathBuf {
    std::env::temp_dir()
        .join(format!("enrollment-store-{}", uuid::Uuid::new_v4()))
        .join("students.json")
}

async fn open_store() -> RecordStore {
    RecordStore::open(temp_file())
        .await
        .expect("Failed to open store")
}

fn info(first_name: &str) -> PersonalInfo {
    PersonalInfo {
        last_name: "Valiyev".to_string(),
        first_name: first_name.to_string(),
        father_name: "Karimovich".to_string(),
        age: "19".to_string(),
        phone: "+998901234567".to_string(),
        current_course: "2".to_string(),
        direction: "dasturiy-injiniring".to_string(),
        programming_level: "basic".to_string(),
        language_level: "intermediate".to_string(),
        desired_course: "backend".to_string(),
        has_notebook: "yes".to_string(),
    }
}

fn result(score: u32) -> TestResult {
    TestResult::from_score(score, 10, Utc::now())
}

#[tokio::test]
async fn missing_file_lists_empty() {
    let store = open_store().await;

    assert!(store.list().await.is_empty());
    assert!(!store.path().exists());
}

#[tokio::test]
async fn append_persists_record() {
    let store = open_store().await;
    let before = Utc::now();

    let record = store.append(info("Ali"), result(7)).await.unwrap();

    assert!(!record.id.is_empty());
    assert!(record.submitted_at >= before);
    assert_eq!(record.test_result.percentage, 70);

    // A second handle on the same file sees the record.
    let reopened = RecordStore::open(store.path()).await.unwrap();
    let students = reopened.list().await;
    assert_eq!(students, vec![record]);

    let raw = std::fs::read_to_string(store.path()).unwrap();
    assert!(raw.starts_with("[\n  {"));
    assert!(raw.contains("\"personalInfo\""));
    assert!(!store.tmp_path().exists());
}

#[tokio::test]
async fn append_sanitizes_fields() {
    let store = open_store().await;

    let mut dirty = info("  <b>Ali</b> ");
    dirty.father_name = "O'g'li & co".to_string();

    let record = store.append(dirty, result(5)).await.unwrap();

    assert_eq!(record.personal_info.first_name, "Ali");
    assert_eq!(record.personal_info.father_name, "O'g'li &amp; co");
    assert_eq!(store.list().await[0].personal_info.first_name, "Ali");
}

#[tokio::test]
async fn name_length_counts_typed_characters() {
    let store = open_store().await;

    // 100 characters as typed; escaping turns '&' into five.
    let name = format!("{}&{}", "a".repeat(49), "b".repeat(50));
    let record = store.append(info(&name), result(5)).await.unwrap();

    let expected = format!("{}&amp;{}", "a".repeat(49), "b".repeat(50));
    assert_eq!(record.personal_info.first_name, expected);

    // Longer input is cut to the field limit rather than rejected.
    let long = "c".repeat(150);
    let record = store.append(info(&long), result(5)).await.unwrap();
    assert_eq!(record.personal_info.first_name, "c".repeat(100));

    assert_eq!(store.list().await.len(), 2);
}

#[tokio::test]
async fn name_errors_say_what_is_wrong() {
    let store = open_store().await;

    let err = store.append(info("   "), result(5)).await.unwrap_err();
    assert!(err.to_string().contains("This field is required."));

    // A record built in code skips sanitizing, so the upper bound still applies.
    let too_long = info(&"d".repeat(101));
    let message = too_long.validate().unwrap_err().to_string();
    assert!(message.contains("Must be at most 100 characters."));
    assert!(!message.contains("required"));
}

#[tokio::test]
async fn append_rejects_invalid_input() {
    let store = open_store().await;

    let mut bad_phone = info("Ali");
    bad_phone.phone = "12345".to_string();
    let err = store.append(bad_phone, result(5)).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    let mut too_young = info("Ali");
    too_young.age = "9".to_string();
    assert!(store.append(too_young, result(5)).await.is_err());

    let mut inconsistent = result(5);
    inconsistent.percentage = 90;
    let err = store.append(info("Ali"), inconsistent).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    // Markup-only names become empty after sanitizing.
    assert!(store.append(info("<script></script>"), result(5)).await.is_err());

    assert!(!store.path().exists());
}

#[tokio::test]
async fn concurrent_appends_keep_every_record() {
    let store = open_store().await;

    let handles: Vec<_> = (0..50)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .append(info(&format!("Student{}", i)), result(i % 11))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let students = store.list().await;
    assert_eq!(students.len(), 50);

    let ids: HashSet<_> = students.iter().map(|s| s.id.clone()).collect();
    assert_eq!(ids.len(), 50);

    let names: HashSet<_> = students
        .iter()
        .map(|s| s.personal_info.first_name.clone())
        .collect();
    assert_eq!(names.len(), 50);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let store = open_store().await;

    let first = store.append(info("Ali"), result(5)).await.unwrap();
    let second = store.append(info("Vali"), result(6)).await.unwrap();

    let removed = store.delete_by_id(&first.id).await.unwrap();
    assert_eq!(removed.id, first.id);
    assert_eq!(store.list().await, vec![second.clone()]);

    let err = store.delete_by_id(&first.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert_eq!(store.list().await, vec![second]);
}

#[tokio::test]
async fn clear_empties_collection() {
    let store = open_store().await;

    store.append(info("Ali"), result(5)).await.unwrap();
    store.append(info("Vali"), result(6)).await.unwrap();

    store.clear().await.unwrap();
    assert!(store.list().await.is_empty());
    assert_eq!(std::fs::read_to_string(store.path()).unwrap().trim(), "[]");

    let record = store.append(info("Sardor"), result(9)).await.unwrap();
    assert_eq!(store.list().await, vec![record]);
}

#[tokio::test]
async fn failed_write_leaves_previous_file() {
    let store = open_store().await;
    let kept = store.append(info("Ali"), result(5)).await.unwrap();
    let before = std::fs::read(store.path()).unwrap();

    // A directory in place of the scratch file makes the write fail.
    std::fs::create_dir(store.tmp_path()).unwrap();

    let err = store.append(info("Vali"), result(6)).await.unwrap_err();
    assert!(matches!(err, StoreError::Persistence { .. }));
    assert!(store.clear().await.is_err());

    assert_eq!(std::fs::read(store.path()).unwrap(), before);
    assert_eq!(store.list().await, vec![kept]);

    std::fs::remove_dir(store.tmp_path()).unwrap();
    store.append(info("Vali"), result(6)).await.unwrap();
    assert_eq!(store.list().await.len(), 2);
}

#[tokio::test]
async fn corrupt_file_is_never_overwritten() {
    let store = open_store().await;
    std::fs::write(store.path(), "[{\"id\": \"broken\"").unwrap();

    assert!(store.list().await.is_empty());
    assert!(store.find("broken").await.is_none());

    let err = store.append(info("Ali"), result(5)).await.unwrap_err();
    assert!(matches!(err, StoreError::Persistence { .. }));
    assert!(store.delete_by_id("broken").await.is_err());

    assert_eq!(
        std::fs::read_to_string(store.path()).unwrap(),
        "[{\"id\": \"broken\""
    );
}

#[tokio::test]
async fn empty_file_reads_as_empty_collection() {
    let store = open_store().await;
    std::fs::write(store.path(), "  \n").unwrap();

    assert!(store.list().await.is_empty());
    store.append(info("Ali"), result(5)).await.unwrap();
    assert_eq!(store.list().await.len(), 1);
}
