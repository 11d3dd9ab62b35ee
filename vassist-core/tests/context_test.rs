//! Tests for the application context lifecycle (load at startup, save on completion)

use vassist_core::{
    AppContext, Error, JsonProfileStore, MemoryProfileStore, ProfileStore, UserProfile,
};

fn profile() -> UserProfile {
    UserProfile {
        name: "Ravi".to_string(),
        age: "71".to_string(),
        emergency_contact: "555 0199".to_string(),
    }
}

#[test]
fn test_load_without_profile() {
    let store = MemoryProfileStore::new();
    let ctx = AppContext::load(&store).unwrap();
    assert!(!ctx.has_profile());
    assert!(ctx.profile().is_none());
    assert!(!ctx.is_muted());
}

#[test]
fn test_load_existing_profile() {
    let store = MemoryProfileStore::with_profile(profile());
    let ctx = AppContext::load(&store).unwrap();
    assert_eq!(ctx.profile(), Some(profile()));
}

#[test]
fn test_complete_profile_persists() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonProfileStore::new(dir.path().join("profile.json"));
    let ctx = AppContext::load(&store).unwrap();

    ctx.complete_profile(profile(), &store).unwrap();
    assert!(ctx.has_profile());

    // A fresh context sees the saved record
    let reloaded = AppContext::load(&store).unwrap();
    assert_eq!(reloaded.profile(), Some(profile()));
}

#[test]
fn test_complete_profile_rejects_partial() {
    let store = MemoryProfileStore::new();
    let ctx = AppContext::new();
    let mut partial = profile();
    partial.emergency_contact.clear();

    match ctx.complete_profile(partial, &store) {
        Err(Error::Profile(msg)) => assert!(msg.contains("missing")),
        other => panic!("Expected Profile error, got {:?}", other),
    }
    assert!(store.load().unwrap().is_none());
    assert!(!ctx.has_profile());
}
