use super::eventually;
use super::knowledge_base;
use super::navigator;
use super::navigator_with;
use super::test_config;
use kbnav_core::ErrorKind;
use kbnav_core::NavError;
use kbnav_core::NavPhase;
use kbnav_core::NavigateOutcome;
use kbnav_core::NavigatorConfig;
use kbnav_protocol::ContentFormat;
use kbnav_protocol::ServiceError;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn navigating_to_a_section_loads_content_children_and_cache() {
    let service = knowledge_base();
    let nav = navigator(&service);

    let outcome = nav.navigate_to("kb::sec-3").await.unwrap();
    assert_eq!(outcome, NavigateOutcome::Navigated("kb::sec-3".to_string()));

    let snapshot = nav.snapshot();
    let current = snapshot.current.clone().unwrap();
    assert_eq!(current.id, "kb::sec-3");
    assert_eq!(
        current.formatted_content.and_then(|content| content.markdown),
        Some("# sec-3\n\n".to_string())
    );
    let crumbs: Vec<&str> = snapshot.breadcrumb.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(crumbs, vec!["kb", "kb::sec-3"]);
    assert_eq!(
        snapshot.children.get("kb::sec-3"),
        Some(&vec!["kb::sec-3::a".to_string(), "kb::sec-3::b".to_string()])
    );
    assert_eq!(snapshot.child_previews["kb::sec-3"].len(), 2);
    assert_eq!(snapshot.history.items, vec!["kb", "kb::sec-3"]);
    assert_eq!(snapshot.history.cursor, 1);
    assert_eq!(snapshot.phase, NavPhase::Idle);
    assert!(!snapshot.loading.navigation);
    assert_eq!(snapshot.last_error, None);

    let cached = nav.cached("kb::sec-3").unwrap();
    assert_eq!(cached.node.id, "kb::sec-3");
    assert_eq!(cached.breadcrumb, snapshot.breadcrumb);

    assert_eq!(
        service.calls(),
        vec![
            "resolve:kb::sec-3",
            "node_detail:kb::sec-3",
            "navigate:kb::sec-3",
            "list_modules",
            "loaded_roots",
            "history",
            "children:kb::sec-3",
            "preview_children:kb::sec-3",
        ]
    );
}

#[tokio::test]
async fn placeholder_targets_touch_nothing() {
    let service = knowledge_base();
    let nav = navigator(&service);
    let before = nav.snapshot();

    for target in ["", "undefined"] {
        let err = nav.navigate_to(target).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    assert!(service.calls().is_empty());
    let after = nav.snapshot();
    assert_eq!(after.current, before.current);
    assert_eq!(after.last_error, None);
    assert_eq!(after.phase, NavPhase::Idle);
}

#[tokio::test]
async fn ambiguous_target_fails_with_candidate_count() {
    let service = knowledge_base();
    service.ambiguous("intro", &["kb::intro", "m1::intro", "m2::intro"]);
    let nav = navigator(&service);

    let err = nav.navigate_to("intro").await.unwrap_err();
    assert_eq!(
        err,
        NavError::Ambiguous {
            target: "intro".to_string(),
            candidates: 3,
        }
    );
    assert_eq!(service.calls(), vec!["resolve:intro"]);

    let snapshot = nav.snapshot();
    assert_eq!(snapshot.current, None);
    assert_eq!(snapshot.cache.entries, 0);
    assert_eq!(snapshot.phase, NavPhase::Idle);
    let last_error = snapshot.last_error.unwrap();
    assert_eq!(last_error.kind, ErrorKind::Resolution);
    assert_eq!(last_error.operation, "navigate");
}

#[tokio::test]
async fn unknown_target_is_not_found() {
    let service = knowledge_base();
    let nav = navigator(&service);

    let err = nav.navigate_to("nowhere").await.unwrap_err();
    assert!(matches!(err, NavError::NotFound { .. }));
    assert_eq!(service.count("node_detail"), 0);
}

#[tokio::test]
async fn already_at_target_only_refreshes_the_cache() {
    let service = knowledge_base();
    let nav = navigator(&service);
    nav.navigate_to("kb::sec-3").await.unwrap();
    let before = nav.snapshot();

    service.update_node("kb::sec-3", |node| node.label = "renamed".to_string());
    service.clear_calls();

    let outcome = nav.navigate_to("kb::sec-3").await.unwrap();
    assert_eq!(outcome, NavigateOutcome::AlreadyAtTarget("kb::sec-3".to_string()));

    let after = nav.snapshot();
    assert_eq!(after.breadcrumb, before.breadcrumb);
    assert_eq!(after.history, before.history);
    assert_eq!(service.count("list_modules"), 0);
    assert_eq!(service.count("history"), 0);

    let cached = nav.cached("kb::sec-3").unwrap();
    assert_eq!(cached.node.label, "renamed");
    assert_eq!(cached.breadcrumb, before.breadcrumb);
}

#[tokio::test]
async fn staying_on_a_primed_node_keeps_the_breadcrumb() {
    let service = knowledge_base();
    service.set_history(&["kb", "kb::sec-3", "kb::intro"], 2);
    let nav = navigator_with(
        &service,
        NavigatorConfig {
            prime_history: true,
            ..test_config()
        },
    );
    nav.refresh_history().await.unwrap();
    eventually(|| nav.cache_stats().entries == 3).await;
    assert!(nav.cached("kb::sec-3").unwrap().breadcrumb.is_empty());

    nav.move_back(1).await.unwrap();
    let before = nav.breadcrumb();
    let crumbs: Vec<&str> = before.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(crumbs, vec!["kb", "kb::sec-3"]);

    let outcome = nav.navigate_to("kb::sec-3").await.unwrap();
    assert_eq!(outcome, NavigateOutcome::AlreadyAtTarget("kb::sec-3".to_string()));
    assert_eq!(nav.breadcrumb(), before);
    assert_eq!(nav.cached("kb::sec-3").unwrap().breadcrumb, before);
    assert_eq!(nav.phase(), NavPhase::Idle);
}

#[tokio::test]
async fn cached_node_is_shown_while_fetching() {
    let service = knowledge_base();
    let nav = navigator(&service);
    nav.navigate_to("kb::sec-3").await.unwrap();
    nav.navigate_to("kb::intro").await.unwrap();

    let gate = service.hold("node_detail:kb::sec-3");
    let task = tokio::spawn({
        let nav = nav.clone();
        async move { nav.navigate_to("kb::sec-3").await }
    });
    service.wait_for_calls("node_detail:kb::sec-3", 2).await;

    assert_eq!(nav.current().map(|node| node.id), Some("kb::sec-3".to_string()));
    assert_eq!(nav.breadcrumb().len(), 2);
    assert_eq!(nav.phase(), NavPhase::Fetching);
    assert!(nav.loading().navigation);

    gate.open();
    task.await.unwrap().unwrap();
    assert_eq!(nav.phase(), NavPhase::Idle);
    assert!(!nav.loading().navigation);
}

#[tokio::test]
async fn transport_failure_returns_to_idle() {
    let service = knowledge_base();
    service.fail(
        "node_detail",
        ServiceError::transport("node detail", "connection refused"),
    );
    let nav = navigator(&service);

    let err = nav.navigate_to("kb::intro").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(service.count("navigate"), 0);

    let snapshot = nav.snapshot();
    assert_eq!(snapshot.current, None);
    assert_eq!(snapshot.phase, NavPhase::Idle);
    assert!(!snapshot.loading.navigation);
    assert_eq!(snapshot.last_error.map(|err| err.kind), Some(ErrorKind::Transport));

    service.recover("node_detail");
    let outcome = nav.navigate_to("kb::intro").await.unwrap();
    assert_eq!(outcome, NavigateOutcome::Navigated("kb::intro".to_string()));
}

#[tokio::test]
async fn failed_history_refresh_keeps_committed_node() {
    let service = knowledge_base();
    service.fail("history", ServiceError::transport("history", "timeout"));
    let nav = navigator(&service);

    assert!(nav.navigate_to("kb::intro").await.is_err());
    assert_eq!(nav.current().map(|node| node.id), Some("kb::intro".to_string()));
    assert_eq!(nav.cached("kb::intro"), None);
}

#[tokio::test]
async fn cache_is_bounded_by_capacity() {
    let service = knowledge_base();
    let nav = navigator_with(
        &service,
        NavigatorConfig {
            cache_capacity: 1,
            ..test_config()
        },
    );

    nav.navigate_to("kb::intro").await.unwrap();
    nav.navigate_to("m1::r1::x").await.unwrap();

    assert_eq!(nav.cache_stats().entries, 1);
    assert!(nav.cached("kb::intro").is_none());
    assert!(nav.cached("m1::r1::x").is_some());
}

#[tokio::test]
async fn load_current_node_adopts_server_cursor() {
    let service = knowledge_base();
    let nav = navigator(&service);

    let outcome = nav.load_current_node().await.unwrap();
    assert_eq!(outcome, NavigateOutcome::Navigated("kb".to_string()));

    let snapshot = nav.snapshot();
    assert_eq!(snapshot.breadcrumb.len(), 1);
    assert_eq!(snapshot.history.items, vec!["kb"]);
    assert!(snapshot.current.unwrap().formatted_content.is_some());
    assert_eq!(
        snapshot.children.get("kb"),
        Some(&vec!["kb::sec-3".to_string(), "kb::intro".to_string()])
    );
    assert!(nav.cached("kb").is_some());
}

#[tokio::test]
async fn fetch_node_view_applies_new_format() {
    let service = knowledge_base();
    let nav = navigator(&service);
    nav.fetch_node_view().await.unwrap();
    assert!(service.calls().is_empty());

    nav.navigate_to("kb::intro").await.unwrap();
    nav.set_content_format(ContentFormat::Text);
    nav.fetch_node_view().await.unwrap();

    let content = nav.current().and_then(|node| node.formatted_content).unwrap();
    assert_eq!(content.plain_text, Some("body of kb::intro".to_string()));
    assert_eq!(content.markdown, None);
    assert_eq!(nav.snapshot().content_format, ContentFormat::Text);
}

#[tokio::test]
async fn initialize_lists_modules_then_loads_current() {
    let service = knowledge_base();
    let nav = navigator(&service);

    nav.initialize().await.unwrap();

    let snapshot = nav.snapshot();
    assert_eq!(snapshot.loaded_modules, vec!["kb", "m1"]);
    assert_eq!(snapshot.available_modules, vec!["kb", "m1", "m2"]);
    assert_eq!(snapshot.current.map(|node| node.id), Some("kb".to_string()));
    assert_eq!(
        service.calls()[..3].to_vec(),
        vec!["list_modules", "loaded_roots", "current_node"]
    );
}

#[tokio::test]
async fn expansion_toggles_through_the_engine() {
    let service = knowledge_base();
    let nav = navigator(&service);

    assert!(nav.is_expanded("::ROOT"));
    assert!(nav.toggle_expansion("kb::sec-3"));
    assert!(nav.is_expanded("kb::sec-3"));
    assert!(!nav.toggle_expansion("kb::sec-3"));
    assert!(!nav.toggle_expansion("undefined"));
    assert_eq!(nav.snapshot().expanded, vec!["::ROOT"]);
}
