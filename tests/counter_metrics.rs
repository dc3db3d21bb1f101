mod support;

use std::collections::HashMap;
use std::sync::Arc;

use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use hitcount::application::counter::DEFAULT_CACHE_KEY;

use support::{MemoryCounterRepo, RecordingCache, counter_service};

// One recorder per process, so every scenario lives in this single test.
#[tokio::test]
async fn counter_paths_emit_expected_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let repo = Arc::new(MemoryCounterRepo::starting_at(3));
    let cache = Arc::new(RecordingCache::default());
    let service = counter_service(repo.clone(), cache.clone());

    // miss, then a view that invalidates
    service.record_view().await.expect("first view");
    // hit on a primed entry
    cache.prime(DEFAULT_CACHE_KEY, "10").await;
    service.record_view().await.expect("second view");
    // outage: get fails (miss), set_ex and delete fail
    cache.set_down(true);
    service.record_view().await.expect("third view");

    let counters: HashMap<(String, Vec<String>), u64> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(composite_key, _, _, value)| {
            let key = composite_key.key();
            let labels = key
                .labels()
                .map(|label| format!("{}={}", label.key(), label.value()))
                .collect();
            match value {
                DebugValue::Counter(total) => Some(((key.name().to_string(), labels), total)),
                _ => None,
            }
        })
        .collect();

    let get = |name: &str, labels: &[&str]| {
        let labels = labels.iter().map(|label| label.to_string()).collect();
        counters
            .get(&(name.to_string(), labels))
            .copied()
            .unwrap_or(0)
    };

    assert_eq!(get("hitcount_page_views_total", &[]), 3);
    assert_eq!(get("hitcount_counter_cache_hit_total", &[]), 1);
    assert_eq!(get("hitcount_counter_cache_miss_total", &[]), 2);
    assert_eq!(get("hitcount_counter_cache_error_total", &["op=get"]), 1);
    assert_eq!(get("hitcount_counter_cache_error_total", &["op=set_ex"]), 1);
    assert_eq!(get("hitcount_counter_cache_error_total", &["op=delete"]), 1);
    assert_eq!(repo.count(), 6);
}
