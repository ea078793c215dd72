use std::io::Write;
use std::sync::{Arc, Mutex};

use json_query::{registry, JsonQuery, JsonValue};
use tempfile::NamedTempFile;

// the registry is process-wide; its tests must not interleave
static REGISTRY_LOCK: Mutex<()> = Mutex::new(());

const STORE: &str = r#"{"store": {"book": [
    {"category": "reference", "title": "r1", "price": 8},
    {"category": "fiction", "title": "f1", "price": 12},
    {"category": "fiction", "title": "f2", "price": 20},
    "not an object",
    {"category": "science", "title": "s1", "price": 30}
]}}"#;

fn store_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(STORE.as_bytes()).unwrap();
    file
}

fn titles(results: &[JsonValue]) -> Vec<&str> {
    results
        .iter()
        .map(|v| v.get("title").and_then(JsonValue::as_str).unwrap())
        .collect()
}

#[test]
fn cache_array_unwraps_the_single_array_result() {
    let file = store_file();
    let mut handle = JsonQuery::open(file.path()).unwrap();
    let cached = handle.cache_array("$.store.book").unwrap();
    assert_eq!(cached.len(), 5);
    assert!(handle.is_array_cached("$.store.book"));
}

#[test]
fn cache_array_of_nothing_caches_nothing() {
    let file = store_file();
    let mut handle = JsonQuery::open(file.path()).unwrap();
    assert!(handle.cache_array("$.store.magazine").is_none());
    assert!(!handle.is_array_cached("$.store.magazine"));
}

#[test]
fn cached_and_streamed_filter_results_agree() {
    let file = store_file();
    let mut handle = JsonQuery::open(file.path()).unwrap();
    for filter_path in [
        "$.store.book[?(@.category=='fiction')]",
        "$.store.book[?(@.price>10)]",
        "$.store.book[?(@.price>10&&@.category=='fiction')]",
        "$.store.book[?(@.category=='nope')]",
    ] {
        let streamed = handle.query(filter_path);
        handle.cache_array("$.store.book").unwrap();
        let served = handle.query(filter_path);
        assert_eq!(streamed, served, "cache transparency for `{filter_path}`");
        handle.clear_array_cache();
    }
}

#[test]
fn cached_dispatch_serves_aliased_keys_without_touching_the_file() {
    let file = store_file();
    let mut handle = JsonQuery::open(file.path()).unwrap();
    handle
        .cache_array_as("$.store.book", "$.shelf")
        .unwrap();
    // `$.shelf` does not exist in the document, so these results can only
    // come from the cache
    let fiction = handle.query("$.shelf[?(@.category=='fiction')]");
    assert_eq!(titles(&fiction), vec!["f1", "f2"]);
    let plain = handle.query("$.shelf");
    assert_eq!(plain.len(), 5);
}

#[test]
fn cached_results_honour_limit_and_predicate() {
    let file = store_file();
    let mut handle = JsonQuery::open(file.path()).unwrap();
    handle.cache_array("$.store.book").unwrap();

    let bounded = handle.query_limit("$.store.book[?(@.price>10)]", 2);
    assert_eq!(titles(&bounded), vec!["f1", "f2"]);

    let predicate = |v: &JsonValue| v.get("title").and_then(JsonValue::as_str) != Some("f1");
    let filtered = handle.query_with("$.store.book[?(@.price>10)]", -1, Some(&predicate));
    assert_eq!(titles(&filtered), vec!["f2", "s1"]);
}

#[test]
fn non_object_cached_elements_are_skipped_by_filters() {
    let file = store_file();
    let mut handle = JsonQuery::open(file.path()).unwrap();
    handle.cache_array("$.store.book").unwrap();
    let all_matchable = handle.query("$.store.book[?(@.price>0)]");
    assert_eq!(all_matchable.len(), 4);
}

#[test]
fn invalidate_and_clear_fall_back_to_streaming() {
    let file = store_file();
    let mut handle = JsonQuery::open(file.path()).unwrap();
    handle.cache_array("$.store.book").unwrap();
    handle.invalidate_array_cache("$.store.book");
    assert!(!handle.is_array_cached("$.store.book"));
    // still correct, now streamed
    assert_eq!(handle.query("$.store.book[?(@.price>10)]").len(), 3);

    handle.cache_array_as("$.store.book", "$.a").unwrap();
    handle.cache_array_as("$.store.book", "$.b").unwrap();
    handle.clear_array_cache();
    assert!(!handle.is_array_cached("$.a"));
    assert!(!handle.is_array_cached("$.b"));
}

#[test]
fn filters_followed_by_more_segments_are_not_cache_served() {
    let file = store_file();
    let mut handle = JsonQuery::open(file.path()).unwrap();
    handle.cache_array("$.store.book").unwrap();
    let t = handle.query("$.store.book[?(@.category=='fiction')].title");
    assert_eq!(
        t,
        vec![JsonValue::Str("f1".into()), JsonValue::Str("f2".into())]
    );
}

#[test]
fn registry_returns_the_same_handle_for_the_same_path() {
    let _guard = REGISTRY_LOCK.lock().unwrap();
    let file = store_file();
    let a = registry::get_or_create(file.path()).unwrap();
    let b = registry::get_or_create(file.path()).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    registry::release_instance(file.path());
}

#[test]
fn registry_identity_holds_under_concurrent_lookups() {
    let _guard = REGISTRY_LOCK.lock().unwrap();
    let file = store_file();
    let path = file.path().to_path_buf();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let path = path.clone();
            std::thread::spawn(move || registry::get_or_create(path).unwrap())
        })
        .map(|t| t.join().unwrap())
        .collect();
    for handle in &handles[1..] {
        assert!(Arc::ptr_eq(&handles[0], handle));
    }
    registry::release_instance(&path);
}

#[test]
fn registry_rejects_missing_files() {
    let _guard = REGISTRY_LOCK.lock().unwrap();
    let err = registry::get_or_create("/no/such/document.json").unwrap_err();
    assert!(matches!(err, json_query::QueryError::NotFound(_)));
}

#[test]
fn released_instances_are_recreated_on_next_lookup() {
    let _guard = REGISTRY_LOCK.lock().unwrap();
    let file = store_file();
    let first = registry::get_or_create(file.path()).unwrap();
    registry::release_instance(file.path());
    let second = registry::get_or_create(file.path()).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    // the caller-held reference stays usable after release
    assert_eq!(first.lock().unwrap().query("$.store.book[*]").len(), 5);
    registry::release_instance(file.path());
}

#[test]
fn queries_work_through_the_shared_handle() {
    let _guard = REGISTRY_LOCK.lock().unwrap();
    let file = store_file();
    let shared = registry::get_or_create(file.path()).unwrap();
    {
        let mut handle = shared.lock().unwrap();
        handle.cache_array("$.store.book").unwrap();
        assert_eq!(handle.query("$.store.book[?(@.price>10)]").len(), 3);
    }
    registry::release_all();
}
