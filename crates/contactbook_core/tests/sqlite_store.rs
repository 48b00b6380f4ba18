use contactbook_core::{Contact, ContactManager, ContactStore, ContactUpdate, SqliteContactStore};

fn sample(first: &str, last: &str, email: &str, company: &str) -> Contact {
    Contact::new(first, last, email)
        .unwrap()
        .with_company(company)
        .with_notes("imported")
}

#[test]
fn fresh_database_loads_empty_collection() {
    let store = SqliteContactStore::open_in_memory().unwrap();
    assert!(store.load().unwrap().is_empty());

    let manager = ContactManager::open(store);
    assert!(manager.is_empty());
}

#[test]
fn file_roundtrip_preserves_records_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.db");

    let expected = {
        let mut manager = ContactManager::open(SqliteContactStore::open(&path).unwrap());
        manager.add(sample("Zed", "Young", "zed@x.com", "DataCorp"));
        manager.add(sample("Amy", "Adams", "amy@x.com", "TechCorp"));
        manager
            .update_by_email("zed@x.com", &ContactUpdate::default().with_phone("555-0199"))
            .unwrap();
        assert!(manager.last_save_error().is_none());
        manager.contacts().to_vec()
    };

    let reloaded = ContactManager::open(SqliteContactStore::open(&path).unwrap());
    assert_eq!(reloaded.contacts(), expected.as_slice());
    assert_eq!(reloaded.contacts()[0].email(), "zed@x.com");
    assert_eq!(reloaded.find_by_email("zed@x.com").unwrap().phone(), "555-0199");
}

#[test]
fn save_replaces_previous_rows() {
    let mut store = SqliteContactStore::open_in_memory().unwrap();
    let first = sample("John", "Doe", "john@x.com", "");
    let second = sample("Jane", "Doe", "jane@x.com", "");

    store
        .save(&[first.to_record(), second.to_record()])
        .unwrap();
    store.save(&[second.to_record()]).unwrap();

    let records = store.load().unwrap();
    assert_eq!(records, vec![second.to_record()]);
}

#[test]
fn failed_save_keeps_previous_snapshot() {
    let mut store = SqliteContactStore::open_in_memory().unwrap();
    let john = sample("John", "Doe", "john@x.com", "");
    store.save(&[john.to_record()]).unwrap();

    let duplicate = john.to_record();
    let err = store
        .save(&[duplicate.clone(), duplicate])
        .unwrap_err();
    assert!(err.to_string().contains("UNIQUE"), "unexpected error: {err}");

    assert_eq!(store.load().unwrap(), vec![john.to_record()]);
}
