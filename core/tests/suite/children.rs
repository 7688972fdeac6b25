use super::knowledge_base;
use super::navigator;
use kbnav_core::ErrorKind;
use kbnav_protocol::ChildFilter;
use kbnav_protocol::ChildSort;
use kbnav_protocol::NodeKind;
use kbnav_protocol::ServiceError;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn concurrent_loads_share_one_request() {
    let service = knowledge_base();
    let nav = navigator(&service);
    let gate = service.hold("children:kb");

    let (first, second, ()) = tokio::join!(nav.load_children("kb"), nav.load_children("kb"), async {
        service.wait_for_calls("children:kb", 1).await;
        gate.open();
    });
    first.unwrap();
    second.unwrap();

    assert_eq!(service.count("children:kb"), 1);
    assert_eq!(service.count("preview_children:kb"), 1);
    assert_eq!(
        nav.snapshot().children.get("kb"),
        Some(&vec!["kb::sec-3".to_string(), "kb::intro".to_string()])
    );
}

#[tokio::test]
async fn finished_load_does_not_pin_later_reloads() {
    let service = knowledge_base();
    let nav = navigator(&service);

    nav.load_children("kb::sec-3").await.unwrap();
    nav.load_children("kb::sec-3").await.unwrap();

    assert_eq!(service.count("children:kb::sec-3"), 2);
}

#[tokio::test]
async fn failed_half_does_not_roll_back_the_other() {
    let service = knowledge_base();
    service.fail(
        "preview_children:kb",
        ServiceError::transport("preview children", "reset"),
    );
    let nav = navigator(&service);

    let err = nav.load_children("kb").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);

    let snapshot = nav.snapshot();
    assert_eq!(snapshot.children.get("kb").map(Vec::len), Some(2));
    assert!(!snapshot.child_previews.contains_key("kb"));
}

#[tokio::test]
async fn placeholder_parent_is_rejected() {
    let service = knowledge_base();
    let nav = navigator(&service);

    let err = nav.load_children("undefined").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn preview_query_filters_children() {
    let service = knowledge_base();
    let nav = navigator(&service);
    nav.load_children("kb").await.unwrap();

    nav.set_child_query(ChildFilter::Section, ChildSort::Label);
    assert!(nav.snapshot().child_previews.is_empty());
    nav.load_children("kb").await.unwrap();

    let previews = nav.snapshot().child_previews["kb"].clone();
    assert_eq!(previews.len(), 1);
    assert_eq!(previews[0].id, "kb::sec-3");
    assert_eq!(previews[0].kind, NodeKind::Section);
    assert!(previews[0].has_children);
}
