// Aggregates all former standalone integration tests as modules.
mod children;
mod history;
mod modules;
mod navigate;
mod search;

use core_test_support::FakeService;
use core_test_support::leaf;
use core_test_support::section;
use kbnav_core::Navigator;
use kbnav_core::NavigatorConfig;
use std::sync::Arc;
use std::time::Duration;

/// Two modules, `kb` and `m1`, both loaded, and an unloaded `m2`.
///
/// ```text
/// kb            m1::r1         m1::r2    m2
/// ├─ kb::sec-3  └─ m1::r1::x
/// │  ├─ kb::sec-3::a
/// │  └─ kb::sec-3::b
/// └─ kb::intro
/// ```
pub(crate) fn knowledge_base() -> Arc<FakeService> {
    let service = FakeService::new();
    service.add_module("kb", true);
    service.add_module("m1", true);
    service.add_module("m2", false);

    service.add_node(section("kb", "kb", None));
    service.add_node(section("kb::sec-3", "kb", Some("kb")));
    service.add_node(leaf("kb::sec-3::a", "kb", Some("kb::sec-3")));
    service.add_node(leaf("kb::sec-3::b", "kb", Some("kb::sec-3")));
    service.add_node(leaf("kb::intro", "kb", Some("kb")));
    service.add_node(section("m1::r1", "m1", None));
    service.add_node(section("m1::r2", "m1", None));
    service.add_node(leaf("m1::r1::x", "m1", Some("m1::r1")));
    service.add_node(section("m2", "m2", None));
    service.set_current("kb");
    service.clear_calls();
    Arc::new(service)
}

pub(crate) fn test_config() -> NavigatorConfig {
    NavigatorConfig {
        prime_history: false,
        ..NavigatorConfig::default()
    }
}

pub(crate) fn navigator(service: &Arc<FakeService>) -> Navigator {
    navigator_with(service, test_config())
}

pub(crate) fn navigator_with(service: &Arc<FakeService>, config: NavigatorConfig) -> Navigator {
    Navigator::new(service.clone(), config)
}

/// Polls `condition` until it holds, failing the test after two seconds.
pub(crate) async fn eventually(mut condition: impl FnMut() -> bool) {
    for _ in 0..2000 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("condition not reached in time");
}
