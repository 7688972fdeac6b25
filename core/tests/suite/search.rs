use super::knowledge_base;
use super::navigator;
use kbnav_protocol::SearchHit;
use kbnav_protocol::SearchScope;
use kbnav_protocol::ServiceError;
use pretty_assertions::assert_eq;

fn hit(id: &str) -> SearchHit {
    SearchHit {
        id: id.to_string(),
        label: id.to_string(),
        score: 1.0,
        ..SearchHit::default()
    }
}

#[tokio::test]
async fn search_records_query_and_results() {
    let service = knowledge_base();
    service.set_search_hits(vec![hit("kb::intro"), hit("kb::sec-3")]);
    let nav = navigator(&service);
    nav.set_whole_word(true);

    nav.perform_search("intro", SearchScope::Title).await.unwrap();

    let search = nav.snapshot().search;
    assert_eq!(search.query, "intro");
    assert_eq!(search.scope, SearchScope::Title);
    assert!(search.whole_word);
    assert_eq!(search.results.len(), 2);
    assert!(!nav.loading().search);
}

#[tokio::test]
async fn failed_search_keeps_previous_results() {
    let service = knowledge_base();
    service.set_search_hits(vec![hit("kb::intro")]);
    let nav = navigator(&service);
    nav.perform_search("intro", SearchScope::All).await.unwrap();

    service.fail("search", ServiceError::transport("search", "timeout"));
    nav.perform_search("lemma", SearchScope::Title).await.unwrap();

    let search = nav.snapshot().search;
    assert_eq!(search.query, "intro");
    assert_eq!(search.scope, SearchScope::All);
    assert_eq!(search.results, vec![hit("kb::intro")]);
    assert_eq!(nav.last_error(), None);
    assert!(!nav.loading().search);
}

#[tokio::test]
async fn clear_and_blank_queries_reset_results() {
    let service = knowledge_base();
    service.set_search_hits(vec![hit("kb::intro")]);
    let nav = navigator(&service);

    nav.perform_search("intro", SearchScope::All).await.unwrap();
    nav.clear_search();
    assert!(nav.snapshot().search.results.is_empty());

    nav.perform_search("intro", SearchScope::All).await.unwrap();
    service.clear_calls();
    nav.perform_search("   ", SearchScope::All).await.unwrap();
    assert!(service.calls().is_empty());
    assert_eq!(nav.snapshot().search.query, "");
    assert!(nav.snapshot().search.results.is_empty());
}

#[tokio::test]
async fn clearing_drops_an_in_flight_search() {
    let service = knowledge_base();
    service.set_search_hits(vec![hit("kb::intro")]);
    let nav = navigator(&service);
    let gate = service.hold("search");

    let pending = tokio::spawn({
        let nav = nav.clone();
        async move { nav.perform_search("intro", SearchScope::All).await }
    });
    service.wait_for_calls("search", 1).await;
    nav.clear_search();
    gate.open();
    pending.await.unwrap().unwrap();

    let search = nav.snapshot().search;
    assert_eq!(search.query, "");
    assert!(search.results.is_empty());
}
