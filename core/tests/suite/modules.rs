use super::knowledge_base;
use super::navigator;
use kbnav_core::ModuleRoots;
use kbnav_protocol::ServiceError;
use pretty_assertions::assert_eq;

fn root_ids(roots: &ModuleRoots) -> Vec<String> {
    roots.as_slice().iter().map(|root| root.id.clone()).collect()
}

#[tokio::test]
async fn listing_aggregates_roots_per_module() {
    let service = knowledge_base();
    let nav = navigator(&service);

    nav.list_modules().await.unwrap();

    let snapshot = nav.snapshot();
    assert_eq!(snapshot.modules.len(), 3);
    assert!(matches!(snapshot.roots.get("kb"), Some(ModuleRoots::Single(root)) if root.id == "kb"));
    match snapshot.roots.get("m1") {
        Some(roots @ ModuleRoots::Many(_)) => {
            assert_eq!(root_ids(roots), vec!["m1::r1", "m1::r2"]);
        }
        other => panic!("expected two roots for m1, got {other:?}"),
    }
    assert!(!snapshot.roots.contains_key("m2"));
    assert!(!snapshot.loading.modules);
}

#[tokio::test]
async fn root_failure_keeps_listing() {
    let service = knowledge_base();
    service.fail("loaded_roots", ServiceError::transport("loaded roots", "reset"));
    let nav = navigator(&service);

    nav.list_modules().await.unwrap();

    let snapshot = nav.snapshot();
    assert_eq!(snapshot.loaded_modules, vec!["kb", "m1"]);
    assert!(snapshot.roots.is_empty());
}

#[tokio::test]
async fn unload_drops_roots_before_the_registry_refresh() {
    let service = knowledge_base();
    let nav = navigator(&service);
    nav.list_modules().await.unwrap();
    assert_eq!(nav.snapshot().roots.get("m1").map(ModuleRoots::len), Some(2));

    let gate = service.hold("list_modules");
    let task = tokio::spawn({
        let nav = nav.clone();
        async move { nav.unload_module("m1").await }
    });
    service.wait_for_calls("list_modules", 2).await;

    let during = nav.snapshot();
    assert!(!during.roots.contains_key("m1"));
    assert!(during.roots.contains_key("kb"));
    assert!(during.loading.modules);

    gate.open();
    task.await.unwrap().unwrap();

    let after = nav.snapshot();
    assert_eq!(after.loaded_modules, vec!["kb"]);
    assert!(!after.roots.contains_key("m1"));
    assert!(!after.loading.modules);
}

#[tokio::test]
async fn load_refreshes_registry_then_current_node() {
    let service = knowledge_base();
    let nav = navigator(&service);

    nav.load_module("m2").await.unwrap();

    assert_eq!(
        service.calls()[..5].to_vec(),
        vec![
            "load_module:m2",
            "list_modules",
            "loaded_roots",
            "current_node",
            "history",
        ]
    );
    let snapshot = nav.snapshot();
    assert_eq!(snapshot.loaded_modules, vec!["kb", "m1", "m2"]);
    assert!(snapshot.roots.contains_key("m2"));
    assert_eq!(snapshot.current.map(|node| node.id), Some("kb".to_string()));
}

#[tokio::test]
async fn purge_clears_every_root() {
    let service = knowledge_base();
    let nav = navigator(&service);
    nav.list_modules().await.unwrap();

    nav.purge_modules().await.unwrap();

    let snapshot = nav.snapshot();
    assert!(snapshot.roots.is_empty());
    assert!(snapshot.loaded_modules.is_empty());
}

#[tokio::test]
async fn rejected_load_leaves_registry_alone() {
    let service = knowledge_base();
    let nav = navigator(&service);
    nav.list_modules().await.unwrap();
    service.clear_calls();

    let err = nav.load_module("ghost").await.unwrap_err();
    assert!(err.to_string().contains("module ghost not found"));
    assert_eq!(service.calls(), vec!["load_module:ghost"]);
    assert_eq!(nav.snapshot().loaded_modules, vec!["kb", "m1"]);
    assert_eq!(
        nav.last_error().map(|err| err.operation),
        Some("load module")
    );
}

#[tokio::test]
async fn purge_succeeds_when_the_current_node_is_gone() {
    let service = knowledge_base();
    let nav = navigator(&service);
    nav.list_modules().await.unwrap();
    service.fail(
        "current_node",
        ServiceError::Status {
            operation: "current node",
            status: 404,
            body: "no current node".to_string(),
        },
    );

    nav.purge_modules().await.unwrap();

    assert!(nav.snapshot().roots.is_empty());
    assert_eq!(
        nav.last_error().map(|err| err.operation),
        Some("load current node")
    );
    assert!(!nav.loading().modules);
}
