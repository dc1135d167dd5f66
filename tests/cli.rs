//! End-to-end tests driving the compiled binary against a temp database.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]
#![allow(missing_docs)]

use std::fs;
use std::path::{
    Path,
    PathBuf,
};

use assert_cmd::Command;
use i18n_entries::SqliteStore;
use i18n_entries::store::Locale;
use i18n_entries::types::{
    KeyId,
    LocaleCode,
};
use tempfile::TempDir;

fn cmd(db: &Path) -> Command {
    let mut cmd = Command::cargo_bin("i18n-entries").unwrap();
    cmd.arg("--database").arg(db);
    cmd
}

fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("entries.sqlite3")
}

fn key(id: &str) -> KeyId {
    KeyId::new(id).unwrap()
}

fn locale(code: &str) -> LocaleCode {
    LocaleCode::new(code).unwrap()
}

/// Two locales, three keys, six values — the fixture the export and delete
/// scenarios start from.
fn populate(db: &Path) {
    let locales = [("en-US", "English US"), ("es-EC", "Spanish Ecuador")];
    let keys = [
        ("alt.logo", "Alt text for logo"),
        ("app.name", "Application name"),
        ("app.desc", "This is a test application"),
    ];
    let mut store = SqliteStore::open(db).unwrap();
    for (code, description) in locales {
        store
            .create_locale(&Locale { code: locale(code), description: description.to_string() })
            .unwrap();
    }
    for (code, locale_description) in locales {
        for (id, key_description) in keys {
            store
                .create_value(
                    &key(id),
                    &locale(code),
                    &format!("{key_description} in {locale_description}"),
                    Some(key_description),
                )
                .unwrap();
        }
    }
    assert_eq!(store.value_count().unwrap(), 6);
}

#[test]
fn load_imports_a_single_locale_document() {
    let dir = TempDir::new().unwrap();
    let db = db_path(&dir);
    let source = dir.path().join("en-US.json");
    fs::write(
        &source,
        r#"{
  "account": {
    "messages": {
      "added-ok": {"gloss": "Account added successfully", "verified": false},
      "updated-ok": {"gloss": "Account updated successfully", "verified": false}
    }
  }
}"#,
    )
    .unwrap();

    cmd(&db).args(["load", "en-US", "--target"]).arg(&source).assert().success();

    let store = SqliteStore::open(&db).unwrap();
    assert_eq!(store.value_count().unwrap(), 2);
    let value = store.value(&key("account.messages.added-ok"), &locale("en-US")).unwrap();
    assert_eq!(value.gloss, "Account added successfully");
}

#[test]
fn load_twice_without_override_keeps_existing_values() {
    let dir = TempDir::new().unwrap();
    let db = db_path(&dir);
    let source = dir.path().join("en-US.json");
    fs::write(&source, r#"{"app": {"name": {"gloss": "First", "verified": false}}}"#).unwrap();
    cmd(&db).args(["load", "en-US", "--target"]).arg(&source).assert().success();

    fs::write(&source, r#"{"app": {"name": {"gloss": "Second", "verified": false}}}"#).unwrap();
    let output =
        cmd(&db).args(["load", "en-US", "--no-override", "--target"]).arg(&source).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Skip count: 1"), "unexpected output: {stdout}");

    let store = SqliteStore::open(&db).unwrap();
    assert_eq!(store.value(&key("app.name"), &locale("en-US")).unwrap().gloss, "First");

    // The default overrides.
    cmd(&db).args(["load", "en-US", "--target"]).arg(&source).assert().success();
    let store = SqliteStore::open(&db).unwrap();
    assert_eq!(store.value(&key("app.name"), &locale("en-US")).unwrap().gloss, "Second");
}

#[test]
fn dump_writes_sorted_json() {
    let dir = TempDir::new().unwrap();
    let db = db_path(&dir);
    populate(&db);
    let target = dir.path().join("en-US.json");

    cmd(&db).args(["dump", "en-US", "--target"]).arg(&target).assert().success();

    let tree: serde_json::Value = serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
    assert!(tree.get("alt").is_some());
    assert!(tree.get("app").is_some());
    assert_eq!(
        tree.pointer("/app/desc/gloss").and_then(serde_json::Value::as_str),
        Some("This is a test application in English US")
    );
}

#[test]
fn import_loads_a_locale_tail_tree() {
    let dir = TempDir::new().unwrap();
    let db = db_path(&dir);
    // The locale-tail import references locales by code; they must exist.
    let mut store = SqliteStore::open(&db).unwrap();
    store
        .create_locale(&Locale { code: locale("en-US"), description: "English US".to_string() })
        .unwrap();
    store
        .create_locale(&Locale {
            code: locale("es-EC"),
            description: "Spanish Ecuador".to_string(),
        })
        .unwrap();
    drop(store);

    let source = dir.path().join("entries.yaml");
    fs::write(
        &source,
        "added-ok:
  _desc: messages for successful adding account
  en-US: Account added successfully
  es-EC: Cuenta agregada exitosamente
updated-ok:
  _desc: messages for successful updating account
  en-US: Account updated successfully
  es-EC: Cuenta actualizada con éxito
",
    )
    .unwrap();

    cmd(&db)
        .args(["import", "--target"])
        .arg(&source)
        .arg("account.messages")
        .assert()
        .success();

    let store = SqliteStore::open(&db).unwrap();
    assert_eq!(store.value_count().unwrap(), 4);
    let value = store.value(&key("account.messages.added-ok"), &locale("en-US")).unwrap();
    assert_eq!(value.gloss, "Account added successfully");
    let stored_key = store.key(&key("account.messages.added-ok")).unwrap();
    assert_eq!(stored_key.description, "messages for successful adding account");
}

#[test]
fn import_from_stdin_updates_a_single_leaf() {
    let dir = TempDir::new().unwrap();
    let db = db_path(&dir);
    let mut store = SqliteStore::open(&db).unwrap();
    store
        .create_locale(&Locale { code: locale("en-US"), description: "English US".to_string() })
        .unwrap();
    store
        .create_value(
            &key("account.messages.added-ok"),
            &locale("en-US"),
            "Account added successfully",
            Some("messages for successful adding account"),
        )
        .unwrap();
    drop(store);

    cmd(&db)
        .args(["import", "--target", "-", "account.messages.added-ok"])
        .write_stdin("_desc: Messages for successful adding account\nen-US: Success!")
        .assert()
        .success();

    let store = SqliteStore::open(&db).unwrap();
    let value = store.value(&key("account.messages.added-ok"), &locale("en-US")).unwrap();
    assert_eq!(value.gloss, "Success!");
    let stored_key = store.key(&key("account.messages.added-ok")).unwrap();
    assert_eq!(stored_key.description, "Messages for successful adding account");
}

#[test]
fn import_leaf_onto_intermediate_path_aborts() {
    let dir = TempDir::new().unwrap();
    let db = db_path(&dir);
    let mut store = SqliteStore::open(&db).unwrap();
    store
        .create_locale(&Locale { code: locale("en-US"), description: "English US".to_string() })
        .unwrap();
    store
        .create_value(
            &key("account.messages.added-ok"),
            &locale("en-US"),
            "Account added successfully",
            Some("messages"),
        )
        .unwrap();
    drop(store);

    let output = cmd(&db)
        .args(["import", "--target", "-", "account.messages"])
        .write_stdin("_desc: Messages for successful adding account\nen-US: Success!")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid locale-tail structured tree"),
        "unexpected diagnostics: {stderr}"
    );
    // Nothing changed.
    let store = SqliteStore::open(&db).unwrap();
    assert_eq!(store.value_count().unwrap(), 1);
    assert_eq!(
        store.value(&key("account.messages.added-ok"), &locale("en-US")).unwrap().gloss,
        "Account added successfully"
    );
}

#[test]
fn import_leaf_without_path_aborts() {
    let dir = TempDir::new().unwrap();
    let db = db_path(&dir);

    let output = cmd(&db)
        .args(["import", "--target", "-"])
        .write_stdin("_desc: Messages for successful adding account\nen-US: Success!")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid locale-tail structured tree"),
        "unexpected diagnostics: {stderr}"
    );
}

#[test]
fn export_renders_locale_tail_yaml() {
    let dir = TempDir::new().unwrap();
    let db = db_path(&dir);
    populate(&db);
    let target = dir.path().join("entries.yaml");

    cmd(&db).args(["export", "--target"]).arg(&target).assert().success();

    let tree: serde_json::Value =
        serde_yaml::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
    assert!(tree.get("alt").is_some());
    assert!(tree.get("app").is_some());
    assert_eq!(
        tree.pointer("/app/desc/en-US").and_then(serde_json::Value::as_str),
        Some("This is a test application in English US")
    );

    // Scoped to a sub-tree, rooted at it.
    cmd(&db).args(["export", "--target"]).arg(&target).arg("app").assert().success();
    let tree: serde_json::Value =
        serde_yaml::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
    assert!(tree.get("name").is_some());
    assert!(tree.get("desc").is_some());
    assert!(tree.get("alt").is_none());
    assert_eq!(
        tree.pointer("/desc/en-US").and_then(serde_json::Value::as_str),
        Some("This is a test application in English US")
    );
}

#[test]
fn list_matches_export_to_stdout() {
    let dir = TempDir::new().unwrap();
    let db = db_path(&dir);
    populate(&db);

    let listed = cmd(&db).args(["list", "app"]).output().unwrap();
    assert!(listed.status.success());
    let exported = cmd(&db).args(["export", "--target", "-", "app"]).output().unwrap();
    assert!(exported.status.success());

    assert_eq!(listed.stdout, exported.stdout);
    assert!(!listed.stdout.is_empty());
}

#[test]
fn delete_scoped_then_recursive() {
    let dir = TempDir::new().unwrap();
    let db = db_path(&dir);
    populate(&db);

    cmd(&db).args(["delete", "--locale", "en-US", "alt.logo"]).assert().success();

    let store = SqliteStore::open(&db).unwrap();
    assert_eq!(store.value_count().unwrap(), 5);
    assert!(store.value(&key("alt.logo"), &locale("en-US")).is_err());
    assert!(store.value(&key("alt.logo"), &locale("es-EC")).is_ok());
    drop(store);

    cmd(&db).args(["delete", "-r", "app"]).assert().success();

    let store = SqliteStore::open(&db).unwrap();
    assert_eq!(store.value_count().unwrap(), 1);
    let keys = store.keys().unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys.first().unwrap().id.as_str(), "alt.logo");
}

#[test]
fn dump_descriptions_round_trip() {
    let dir = TempDir::new().unwrap();
    let db = db_path(&dir);
    populate(&db);
    let target = dir.path().join("_desc.json");

    cmd(&db).args(["dump-descriptions", "--target"]).arg(&target).assert().success();
    let tree: serde_json::Value = serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(
        tree.pointer("/app/name").and_then(serde_json::Value::as_str),
        Some("Application name")
    );

    // Loading them back over non-empty descriptions skips by default.
    let output = cmd(&db).args(["load-descriptions", "--target"]).arg(&target).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Skip count: 3"), "unexpected output: {stdout}");
    assert!(stdout.contains("Hint: use --override"), "unexpected output: {stdout}");
}
