use contactbook_core::{
    Contact, ContactManager, ContactStore, ContactUpdate, JsonFileStore, StoreError,
};
use std::fs;

fn sample(first: &str, last: &str, email: &str) -> Contact {
    Contact::new(first, last, email)
        .unwrap()
        .with_phone("555-0100")
        .with_company("TechCorp")
}

#[test]
fn load_missing_file_reports_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.json");
    let store = JsonFileStore::new(&path);
    assert_eq!(store.path(), path.as_path());

    let err = store.load().unwrap_err();
    assert!(err.is_no_data(), "unexpected error: {err}");
}

#[test]
fn save_then_load_reproduces_collection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.json");

    let mut manager = ContactManager::open(JsonFileStore::new(&path));
    manager.add(sample("John", "Doe", "john@x.com"));
    manager.add(sample("Jane", "Smith", "jane@x.com"));
    manager
        .update_by_email("jane@x.com", &ContactUpdate::default().with_notes("met at expo"))
        .unwrap();
    assert!(manager.last_save_error().is_none());

    let reloaded = ContactManager::open(JsonFileStore::new(&path));
    assert_eq!(reloaded.contacts(), manager.contacts());
    assert_eq!(
        reloaded.find_by_email("jane@x.com").unwrap().notes(),
        "met at expo"
    );
}

#[test]
fn save_writes_pretty_json_array_and_leaves_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.json");

    let mut manager = ContactManager::open(JsonFileStore::new(&path));
    manager.add(sample("John", "Doe", "john@x.com"));
    manager.add(sample("Jane", "Smith", "jane@x.com"));
    manager.delete_by_email("john@x.com");

    let text = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["email"], "jane@x.com");
    assert!(text.contains("\n  "));

    let entries = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn save_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("contacts.json");

    let mut store = JsonFileStore::new(&path);
    store.save(&[sample("John", "Doe", "john@x.com").to_record()]).unwrap();

    assert_eq!(store.load().unwrap().len(), 1);
}

#[test]
fn corrupt_file_is_reported_and_manager_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.json");
    fs::write(&path, "[{\"first_name\": \"John\",").unwrap();

    let store = JsonFileStore::new(&path);
    assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));

    let manager = ContactManager::open(store);
    assert!(manager.is_empty());
}

#[test]
fn legacy_file_with_naive_timestamps_and_missing_fields_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.json");
    fs::write(
        &path,
        r#"[
  {
    "first_name": "Alice",
    "last_name": "Brown",
    "email": "alice.brown@email.com",
    "company": "StartupXYZ",
    "created_at": "2024-03-01T09:15:30.250000",
    "updated_at": "2024-03-02T10:00:00.000000",
    "id": 7
  }
]
"#,
    )
    .unwrap();

    let manager = ContactManager::open(JsonFileStore::new(&path));
    let alice = manager.find_by_email("alice.brown@email.com").unwrap();
    assert_eq!(alice.company(), "StartupXYZ");
    assert_eq!(alice.phone(), "");
    assert_eq!(alice.created_at().to_rfc3339(), "2024-03-01T09:15:30.250+00:00");
}

#[test]
fn blank_timestamp_does_not_discard_stored_contacts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.json");
    fs::write(
        &path,
        r#"[
  {
    "first_name": "John",
    "last_name": "Doe",
    "email": "john@x.com",
    "created_at": "2024-01-15T10:30:00",
    "updated_at": "2024-01-15T10:30:00"
  },
  {
    "first_name": "Jane",
    "last_name": "Smith",
    "email": "jane@x.com",
    "created_at": "",
    "updated_at": "2024-01-15 10:30:00"
  }
]
"#,
    )
    .unwrap();

    let mut manager = ContactManager::open(JsonFileStore::new(&path));
    assert_eq!(manager.len(), 2);
    assert!(manager.add(sample("Bob", "Johnson", "bob@x.com")));

    let saved = JsonFileStore::new(&path).load().unwrap();
    let emails: Vec<&str> = saved.iter().map(|record| record.email.as_str()).collect();
    assert_eq!(emails, vec!["john@x.com", "jane@x.com", "bob@x.com"]);
}
