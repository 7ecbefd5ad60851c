//! Load, edit and save cycles across codecs.

use crate::common::{write_temp_config, SERVER_JSON, SERVER_TOML};
use pretty_assertions::assert_eq;
use section_store::{
    CodecError, JsonCodec, Section, Store, StoreError, TomlCodec, Value, YamlCodec,
};

#[test]
fn test_toml_file_edit_and_save() {
    let (_dir, path) = write_temp_config("config.toml", SERVER_TOML);

    let mut store = Store::open(&path).unwrap();
    assert_eq!(store.get_int("server.limits.max_connections", 0).unwrap(), 512);
    assert_eq!(store.get_float("server.limits.ratio", 0.0).unwrap(), 0.75);
    assert!(!store.get_boolean("server.tls", true).unwrap());

    store.set("server.port", 9090).unwrap();
    store.set("server.tls", true).unwrap();
    store.set("logging.level", "debug").unwrap();
    store.save().unwrap();

    let reopened = Store::open(&path).unwrap();
    assert_eq!(reopened.get_int("server.port", 0).unwrap(), 9090);
    assert!(reopened.get_boolean("server.tls", false).unwrap());
    assert_eq!(reopened.get_string("logging.level", "").unwrap(), "debug");
    assert_eq!(
        reopened.get_string("server.host", "").unwrap(),
        "127.0.0.1"
    );
}

#[test]
fn test_json_file_keeps_key_order() {
    let (_dir, path) = write_temp_config("config.json", SERVER_JSON);

    let mut store = Store::open(&path).unwrap();
    assert_eq!(store.codec_name(), "JSON");
    assert_eq!(
        store.get_string_list("server.paths", vec![]).unwrap(),
        vec!["/".to_string(), "/static".to_string()]
    );

    store.set("server.workers", 4).unwrap();
    store.save().unwrap();

    let reopened = Store::open(&path).unwrap();
    assert_eq!(
        reopened.get_section("server").unwrap().unwrap().keys(false),
        vec!["host", "port", "paths", "workers"]
    );
}

#[test]
fn test_convert_toml_to_yaml() {
    let store = Store::parse(SERVER_TOML, TomlCodec).unwrap();
    let yaml = store.render_with(&YamlCodec).unwrap();

    let converted = Store::parse(&yaml, YamlCodec).unwrap();
    assert_eq!(converted.root(), store.root());
}

#[test]
fn test_open_missing_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    match Store::open(&path) {
        Err(StoreError::NotFound(p)) => assert_eq!(p, path),
        other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_failed_reload_keeps_tree() {
    let (_dir, path) = write_temp_config("config.toml", SERVER_TOML);
    let mut store = Store::open(&path).unwrap();

    std::fs::write(&path, "[server\nport = ").unwrap();
    let err = store.reload().unwrap_err();
    assert!(matches!(err, StoreError::Codec(CodecError::Parse { .. })));
    assert_eq!(store.get_int("server.port", 0).unwrap(), 8080);

    std::fs::write(&path, "[server]\nport = 1\n").unwrap();
    store.reload().unwrap();
    assert_eq!(store.get_int("server.port", 0).unwrap(), 1);
    assert!(!store.contains("server.limits").unwrap());
}

#[test]
fn test_save_without_path() {
    let store = Store::new();
    assert!(matches!(store.save(), Err(StoreError::MissingPath)));
}

#[test]
fn test_save_to_creates_parent_dirs() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("nested").join("app").join("config.json");

    let mut store = Store::with_codec(JsonCodec);
    store.set("a.b", Value::List(vec![1.into(), "two".into()])).unwrap();
    store.save_to(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let reopened = Store::parse(&text, JsonCodec).unwrap();
    assert_eq!(
        reopened.get_string_list("a.b", vec![]).unwrap(),
        vec!["1".to_string(), "two".to_string()]
    );
}

#[test]
fn test_non_mapping_document_rejected() {
    let err = Store::parse("- a\n- b\n", YamlCodec).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Codec(CodecError::NotAMapping { .. })
    ));
}

#[test]
fn test_defaults_fill_gaps_only() {
    let mut store = Store::parse(SERVER_TOML, TomlCodec).unwrap();

    let mut defaults = Section::new();
    defaults.set("server.port", 80).unwrap();
    defaults.set("server.timeout_ms", 1000).unwrap();
    defaults.set("metrics.enabled", false).unwrap();
    store.merge_defaults(&defaults);

    assert_eq!(store.get_int("server.port", 0).unwrap(), 8080);
    assert_eq!(store.get_int("server.timeout_ms", 0).unwrap(), 1000);
    assert!(store.contains_section("metrics").unwrap());
}
