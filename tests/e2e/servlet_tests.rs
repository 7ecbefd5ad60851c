//! Servlet layout read through the typed accessors.

use crate::common::{write_temp_config, SERVLETS_YAML};
use pretty_assertions::assert_eq;
use section_store::{servlet_bindings, Store, YamlCodec};

#[test]
fn test_servlet_tree_through_accessors() {
    let store = Store::parse(SERVLETS_YAML, YamlCodec).unwrap();

    let servlets = store.get_section("app.servlets").unwrap().unwrap();
    assert_eq!(servlets.keys(false), vec!["Home", "Api", "Broken"]);

    let home = servlets.get_section("Home").unwrap().unwrap();
    assert_eq!(home.get_string("class", "").unwrap(), "com.example.Home");

    let patterns = home.get_string_array("url-patterns", &[]).unwrap();
    assert_eq!(patterns.len(), 2);
    assert_eq!(patterns[0], "/");
    assert_eq!(patterns[1], "/home");

    // Quoted port still reads as an integer.
    assert_eq!(store.get_int("app.port", 80).unwrap(), 8080);
}

#[test]
fn test_servlet_bindings_skip_scalars() {
    let store = Store::parse(SERVLETS_YAML, YamlCodec).unwrap();

    let bindings = servlet_bindings(&store, "app.servlets").unwrap();
    let names: Vec<&str> = bindings.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["Home", "Api"]);
    assert_eq!(bindings[1].url_patterns.to_vec(), vec!["/api/*".to_string()]);
}

#[test]
fn test_missing_servlet_fields_fall_back() {
    let store = Store::parse(SERVLETS_YAML, YamlCodec).unwrap();

    assert_eq!(
        store
            .get_string("app.servlets.Missing.class", "com.example.Fallback")
            .unwrap(),
        "com.example.Fallback"
    );
    assert_eq!(
        store
            .get_string_array("app.servlets.Broken.url-patterns", &["/*"])
            .unwrap()
            .to_vec(),
        vec!["/*".to_string()]
    );
    // `Broken` is a scalar, so it is not a section.
    assert!(store.contains("app.servlets.Broken").unwrap());
    assert!(!store.contains_section("app.servlets.Broken").unwrap());
}

#[test]
fn test_servlets_from_yaml_file() {
    let (_dir, path) = write_temp_config("web.yml", SERVLETS_YAML);

    let store = Store::open(&path).unwrap();
    assert_eq!(store.codec_name(), "YAML");
    assert_eq!(servlet_bindings(&store, "app.servlets").unwrap().len(), 2);
}
