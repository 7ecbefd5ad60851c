//! Objects stored through named registries.
//!
//! The registry table is process-wide, so tests that touch a shared name run
//! serially and everything else uses a name of its own.

use crate::common::{Endpoint, RetryPolicy};
use pretty_assertions::assert_eq;
use section_store::{
    default_registry, registry, registry_names, registry_with_marker, ConfigObject, Section,
    SerializationError, Store, TomlCodec, DEFAULT_REGISTRY,
};
use serial_test::serial;
use std::sync::Arc;

#[test]
fn test_registry_lookup_is_idempotent() {
    let first = registry("e2e-idempotent");
    let second = registry("e2e-idempotent");
    assert!(Arc::ptr_eq(&first, &second));

    let names = registry_names();
    assert!(names.iter().any(|n| n == DEFAULT_REGISTRY));
    assert!(names.iter().any(|n| n == "e2e-idempotent"));
}

#[test]
fn test_registries_are_isolated() {
    let web = registry("e2e-web");
    let jobs = registry("e2e-jobs");
    web.register::<Endpoint>().unwrap();

    let tagged = web.serialize(&Endpoint::new("localhost", 80)).unwrap();
    assert!(matches!(
        jobs.deserialize_as::<Endpoint>(&tagged),
        Err(SerializationError::UnknownType(_))
    ));
    assert!(matches!(
        jobs.serialize(&Endpoint::new("localhost", 80)),
        Err(SerializationError::NotRegistered { .. })
    ));
}

#[test]
fn test_existing_registry_keeps_marker() {
    let created = registry_with_marker("e2e-marker", "@type");
    let again = registry_with_marker("e2e-marker", "==");
    assert!(Arc::ptr_eq(&created, &again));
    assert_eq!(again.marker(), "@type");
}

#[test]
fn test_hand_written_toml_objects() {
    let registry = registry("e2e-toml");
    registry.register::<Endpoint>().unwrap();
    registry.register::<RetryPolicy>().unwrap();

    let store = Store::parse(
        r#"
        [upstream.primary]
        "==" = "endpoint"
        host = "10.0.0.1"
        port = 443

        [upstream.backup]
        "==" = "==net.Endpoint"
        host = "10.0.0.2"
        port = "8443"

        [upstream.retry]
        "==" = "net.RetryPolicy"
        attempts = 5

        [upstream.plain]
        host = "untagged"
        "#,
        TomlCodec,
    )
    .unwrap()
    .with_registry(Arc::clone(&registry));

    assert_eq!(
        store
            .get_object("upstream.primary", Endpoint::new("", 0))
            .unwrap(),
        Endpoint::new("10.0.0.1", 443)
    );
    assert_eq!(
        store.get_object_opt::<Endpoint>("upstream.backup").unwrap(),
        Some(Endpoint::new("10.0.0.2", 8443))
    );
    assert_eq!(
        store.get_object_opt::<RetryPolicy>("upstream.retry").unwrap(),
        Some(RetryPolicy {
            attempts: 5,
            backoff_ms: 100
        })
    );

    // Untagged sections never become objects.
    assert_eq!(
        store.get_object_opt::<Endpoint>("upstream.plain").unwrap(),
        None
    );
    assert!(matches!(
        store.get_object_dyn("upstream.plain").unwrap(),
        Some(ConfigObject::Section(_))
    ));

    // A tag naming the wrong type reads as absent.
    assert_eq!(
        store.get_object_opt::<Endpoint>("upstream.retry").unwrap(),
        None
    );
}

#[test]
fn test_object_round_trip_through_file() {
    let registry = registry("e2e-file");
    registry.register::<Endpoint>().unwrap();

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("objects.toml");

    let mut store = Store::new().with_registry(Arc::clone(&registry));
    store
        .set_object("cluster.leader", &Endpoint::new("node-1", 7000))
        .unwrap();
    store.save_to(&path).unwrap();

    let reopened = Store::open(&path).unwrap().with_registry(registry);
    assert_eq!(
        reopened.get_string("cluster.leader.==", "").unwrap(),
        "endpoint"
    );

    let object = reopened.get_object_dyn("cluster.leader").unwrap().unwrap();
    assert_eq!(
        object.downcast_ref::<Endpoint>(),
        Some(&Endpoint::new("node-1", 7000))
    );
}

#[test]
fn test_rejected_payload_uses_default() {
    let registry = registry("e2e-rejected");
    registry.register::<Endpoint>().unwrap();

    let mut tagged = Section::new();
    tagged.insert("==", "endpoint");
    tagged.insert("host", "missing-port");

    let mut root = Section::new();
    root.set("svc", tagged.clone()).unwrap();

    let fallback = Endpoint::new("fallback", 1);
    assert_eq!(
        root.get_object("svc", &registry, fallback.clone()).unwrap(),
        fallback
    );
    assert!(matches!(
        registry.deserialize(&tagged),
        Err(SerializationError::Deserialization { .. })
    ));
}

#[test]
#[serial]
fn test_default_registry_backs_new_stores() {
    let registry = default_registry();
    registry.register::<RetryPolicy>().unwrap();

    let mut store = Store::new();
    assert!(Arc::ptr_eq(store.registry(), &registry));

    let policy = RetryPolicy {
        attempts: 2,
        backoff_ms: 50,
    };
    store.set_object("retry", &policy).unwrap();
    assert_eq!(
        store.get_string("retry.==", "").unwrap(),
        "net.RetryPolicy"
    );
    assert_eq!(store.get_object_opt::<RetryPolicy>("retry").unwrap(), Some(policy));

    registry.unregister_type::<RetryPolicy>();
    assert_eq!(store.get_object_opt::<RetryPolicy>("retry").unwrap(), None);
}
