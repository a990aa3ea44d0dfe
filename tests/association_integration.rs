#[path = "../src/association.rs"]
mod association;
#[path = "../src/config.rs"]
mod config;
#[path = "../src/registry.rs"]
mod registry;

use registry::{Hive, KeyStore, MemoryKeyStore};
use std::path::PathBuf;

fn exe() -> PathBuf {
    PathBuf::from(r"C:\Program Files\PolyGlot\polyglot-frontend.exe")
}

#[test]
fn repair_registers_extension_through_both_verbs() {
    let mut store = MemoryKeyStore::new();
    association::repair(&mut store, &exe()).unwrap();

    assert_eq!(
        store.get(Hive::ClassesRoot, config::EXTENSION, "").unwrap(),
        Some(config::PROG_ID.to_string())
    );
    let expected = association::expected_command(&exe());
    for verb in ["open", "edit"] {
        let path = format!("{}\\Shell\\{verb}\\command", config::PROG_ID);
        assert_eq!(
            store.get(Hive::ClassesRoot, &path, "").unwrap(),
            Some(expected.clone())
        );
    }
    assert!(association::is_current(&store, &exe()).unwrap());
}

#[test]
fn repair_follows_a_moved_executable() {
    let mut store = MemoryKeyStore::new();
    association::repair(&mut store, &exe()).unwrap();

    let moved = PathBuf::from(r"D:\Elsewhere\polyglot-frontend.exe");
    assert!(!association::is_current(&store, &moved).unwrap());

    association::repair(&mut store, &moved).unwrap();
    assert!(association::is_current(&store, &moved).unwrap());
    assert_eq!(
        association::current_command(&store).unwrap().unwrap(),
        format!("\"{}\" \"%1\"", moved.display())
    );
}

#[test]
fn repair_takes_over_existing_user_override() {
    let mut store = MemoryKeyStore::new();
    let entry = format!("{}\\{}", config::FILE_EXTS_PATH, config::EXTENSION);
    store.seed_value(Hive::CurrentUser, &entry, "Progid", "OtherApp");
    store.seed_key(Hive::CurrentUser, &format!("{entry}\\UserChoice"));

    association::repair(&mut store, &exe()).unwrap();

    assert_eq!(
        store.get(Hive::CurrentUser, &entry, "Progid").unwrap(),
        Some(config::PROG_ID.to_string())
    );
    assert!(!store
        .exists(Hive::CurrentUser, &format!("{entry}\\UserChoice"))
        .unwrap());
}

#[test]
fn repair_without_user_override_touches_only_classes_root() {
    let mut store = MemoryKeyStore::new();
    association::repair(&mut store, &exe()).unwrap();
    assert!(store
        .writes
        .iter()
        .all(|(hive, _, _, _)| *hive == Hive::ClassesRoot));
    assert!(store.deletes.is_empty());
}
