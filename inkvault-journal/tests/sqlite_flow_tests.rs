//! End-to-end flow over the on-disk SQLite artifact.

use inkvault_crypto::KdfParams;
use inkvault_journal::{EntryService, JournalError, login_blocking, register};
use inkvault_store::SqliteStore;
use std::sync::Arc;

#[test]
fn full_journal_lifecycle_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.db");

    let entry_id = {
        let store = Arc::new(SqliteStore::open(&path).unwrap());
        register(
            store.as_ref(),
            "ada",
            "correct horse",
            &KdfParams::insecure_fast(),
        )
        .unwrap();
        let session = login_blocking(store.as_ref(), "ada", "correct horse").unwrap();
        let service = EntryService::new(store.clone());
        service
            .create_entry(&session, "Mill day", "The old mill stood by the river.")
            .unwrap()
    };

    // A fresh process: reopen the file, unlock, and everything is there.
    let store = Arc::new(SqliteStore::open(&path).unwrap());
    let session = login_blocking(store.as_ref(), "ada", "correct horse").unwrap();
    let service = EntryService::new(store.clone());

    let entry = service.read_entry(&session, entry_id).unwrap();
    assert_eq!(entry.title, "Mill day");
    assert_eq!(entry.body, "The old mill stood by the river.");
    assert!(!entry.map.is_empty());

    let hits = service.search(&session, "river").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, entry_id);

    // Wrong password still fails against the persisted hash.
    assert!(matches!(
        login_blocking(store.as_ref(), "ada", "wrong"),
        Err(JournalError::Auth)
    ));

    // Deletion cascades through the posting table on disk.
    service.delete_entry(&session, entry_id).unwrap();
    assert!(service.search(&session, "river").unwrap().is_empty());
}
