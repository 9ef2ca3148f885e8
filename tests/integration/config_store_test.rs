use battalert::core::config::{Config, Thresholds};
use battalert::core::{ConfigStore, JsonConfigStore};
use battalert::platform::AutostartEntry;
use battalert::BattError;
use tempfile::TempDir;

fn open_store(temp_dir: &TempDir) -> JsonConfigStore {
    let login_item = AutostartEntry::new(
        temp_dir.path().join("autostart").join("battalert.desktop"),
        "[Desktop Entry]\n",
    );
    JsonConfigStore::open(temp_dir.path().join("config.json"), Box::new(login_item)).unwrap()
}

#[test]
fn test_store_defaults_without_file() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir);

    assert_eq!(store.thresholds(), Thresholds { low: 22, high: 78 });
    assert!(!store.login_item());
}

#[test]
fn test_store_persists_thresholds() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir);

    store.set_thresholds(Thresholds { low: 30, high: 70 }).unwrap();
    assert_eq!(store.thresholds(), Thresholds { low: 30, high: 70 });

    let reopened = open_store(&temp_dir);
    assert_eq!(reopened.thresholds(), Thresholds { low: 30, high: 70 });
}

#[test]
fn test_store_rejects_inverted_thresholds() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir);
    store.set_thresholds(Thresholds { low: 25, high: 75 }).unwrap();

    let err = store
        .set_thresholds(Thresholds { low: 80, high: 20 })
        .unwrap_err();

    assert!(matches!(err, BattError::Validation(_)));
    assert_eq!(store.thresholds(), Thresholds { low: 25, high: 75 });
    assert_eq!(
        open_store(&temp_dir).thresholds(),
        Thresholds { low: 25, high: 75 }
    );
}

#[test]
fn test_store_picks_up_external_changes() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir);
    assert_eq!(store.thresholds(), Thresholds::default());

    // Another process (the settings surface) rewrites the file
    let mut config = Config::default();
    config.set_thresholds(Thresholds { low: 5, high: 95 });
    config.save_to(&temp_dir.path().join("config.json")).unwrap();

    assert_eq!(store.thresholds(), Thresholds { low: 5, high: 95 });
}

#[test]
fn test_store_login_item() {
    let temp_dir = TempDir::new().unwrap();
    let store = open_store(&temp_dir);

    store.set_login_item(true).unwrap();
    assert!(store.login_item());
    assert!(temp_dir.path().join("autostart").join("battalert.desktop").exists());

    store.set_login_item(false).unwrap();
    assert!(!store.login_item());
}
