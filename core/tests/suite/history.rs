use super::eventually;
use super::knowledge_base;
use super::navigator;
use super::navigator_with;
use super::test_config;
use kbnav_core::HistoryView;
use kbnav_core::NavigateOutcome;
use kbnav_core::NavigatorConfig;
use kbnav_protocol::ServiceError;
use pretty_assertions::assert_eq;

fn items(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

#[tokio::test]
async fn back_adopts_node_and_cursor_only() {
    let service = knowledge_base();
    service.set_history(&["kb", "kb::sec-3", "kb::intro"], 2);
    let nav = navigator(&service);
    nav.refresh_history().await.unwrap();
    service.clear_calls();

    let outcome = nav.move_back(1).await.unwrap();
    assert_eq!(outcome, NavigateOutcome::Navigated("kb::sec-3".to_string()));

    let snapshot = nav.snapshot();
    assert_eq!(snapshot.current.map(|node| node.id), Some("kb::sec-3".to_string()));
    assert_eq!(snapshot.breadcrumb.len(), 2);
    assert_eq!(
        snapshot.history,
        HistoryView {
            items: items(&["kb", "kb::sec-3", "kb::intro"]),
            cursor: 1,
        }
    );
    assert_eq!(service.calls(), vec!["back:1", "history"]);
}

#[tokio::test]
async fn forward_after_back_returns_to_last_item() {
    let service = knowledge_base();
    service.set_history(&["kb", "kb::sec-3", "kb::intro"], 0);
    let nav = navigator(&service);
    nav.refresh_history().await.unwrap();

    nav.move_forward(2).await.unwrap();
    let snapshot = nav.snapshot();
    assert_eq!(snapshot.current.map(|node| node.id), Some("kb::intro".to_string()));
    assert_eq!(snapshot.history.cursor, 2);
}

#[tokio::test]
async fn zero_steps_move_one() {
    let service = knowledge_base();
    service.set_history(&["kb", "kb::sec-3"], 1);
    let nav = navigator(&service);

    nav.move_back(0).await.unwrap();
    assert_eq!(service.count("back:1"), 1);
}

#[tokio::test]
async fn up_adopts_parent_and_grown_history() {
    let service = knowledge_base();
    let nav = navigator(&service);
    nav.navigate_to("kb::sec-3::a").await.unwrap();

    nav.move_up(1).await.unwrap();

    let snapshot = nav.snapshot();
    assert_eq!(snapshot.current.map(|node| node.id), Some("kb::sec-3".to_string()));
    assert_eq!(
        snapshot.history,
        HistoryView {
            items: items(&["kb", "kb::sec-3::a", "kb::sec-3"]),
            cursor: 2,
        }
    );
}

#[tokio::test]
async fn failed_move_keeps_current_node() {
    let service = knowledge_base();
    let nav = navigator(&service);
    nav.navigate_to("kb::intro").await.unwrap();
    service.fail("back", ServiceError::rejected("navigate back", "at start"));

    assert!(nav.move_back(1).await.is_err());
    assert_eq!(nav.current().map(|node| node.id), Some("kb::intro".to_string()));
    assert_eq!(nav.last_error().map(|err| err.operation), Some("move back"));
}

#[tokio::test]
async fn refresh_primes_uncached_history_items() {
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

    let primed = nav.cached("kb::intro").unwrap();
    assert_eq!(primed.node.id, "kb::intro");
    assert!(primed.breadcrumb.is_empty());

    service.clear_calls();
    nav.refresh_history().await.unwrap();
    tokio::task::yield_now().await;
    assert_eq!(service.count("node_detail"), 0);
}

#[tokio::test]
async fn priming_failures_are_ignored() {
    let service = knowledge_base();
    service.set_history(&["kb", "kb::intro"], 1);
    service.fail(
        "node_detail:kb::intro",
        ServiceError::transport("node detail", "reset"),
    );
    let nav = navigator_with(
        &service,
        NavigatorConfig {
            prime_history: true,
            ..test_config()
        },
    );

    nav.refresh_history().await.unwrap();
    eventually(|| nav.cached("kb").is_some()).await;
    service.wait_for_calls("node_detail:kb::intro", 1).await;

    assert!(nav.cached("kb::intro").is_none());
    assert_eq!(nav.last_error(), None);
}

#[tokio::test]
async fn priming_never_replaces_a_full_entry() {
    let service = knowledge_base();
    let nav = navigator_with(
        &service,
        NavigatorConfig {
            prime_history: true,
            ..test_config()
        },
    );

    nav.navigate_to("kb::sec-3").await.unwrap();
    eventually(|| nav.cached("kb").is_some()).await;
    nav.refresh_history().await.unwrap();
    tokio::task::yield_now().await;

    let entry = nav.cached("kb::sec-3").unwrap();
    assert_eq!(entry.breadcrumb.len(), 2);
    assert!(entry.node.formatted_content.and_then(|c| c.markdown).is_some());
}
