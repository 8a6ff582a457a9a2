//! Integration Tests for the Caching Client
//!
//! Drives NotionClient end to end against a scripted transport and checks
//! hit/miss behavior, invalidation after writes and the statistics surface.

mod common;

use std::time::Duration;

use notion_cache::models::{BlockChildrenParams, CreatePageRequest, Parent, QueryDataSourceParams};
use notion_cache::{ClientConfig, Method, NotionError, Partition};
use proptest::prelude::*;
use serde_json::json;

use common::{client, client_with, config, ScriptedTransport};

// == Scenarios ==

#[tokio::test]
async fn test_lru_scenario_with_capacity_two() {
    let transport = ScriptedTransport::new();
    let client = client_with(
        ClientConfig {
            cache_ttl_pages: 300,
            cache_max_size_pages: Some(2),
            ..config()
        },
        &transport,
    );

    client.get_page("A").await.unwrap(); // miss, stored
    client.get_page("A").await.unwrap(); // hit
    client.get_page("B").await.unwrap(); // miss
    client.get_page("C").await.unwrap(); // miss, evicts A
    assert_eq!(transport.calls_to(Method::Get, "pages/A"), 1);

    // A is no longer cached, so the update evicts nothing
    client.update_page("A", json!({})).await.unwrap();
    let stats = client.get_cache_stats().await;
    assert_eq!(stats.invalidations, 0);

    client.get_page("A").await.unwrap(); // miss, fresh fetch
    assert_eq!(transport.calls_to(Method::Get, "pages/A"), 2);

    let stats = client.get_cache_stats().await;
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 4);
    assert_eq!(stats.cache_sizes[&Partition::Pages], 2);
    assert_eq!(stats.hit_rate_percent, 20.0);
}

#[tokio::test]
async fn test_page_cap_leaves_other_partitions_alone() {
    let transport = ScriptedTransport::new();
    let client = client_with(
        ClientConfig {
            cache_max_size_pages: Some(2),
            ..config()
        },
        &transport,
    );

    for id in ["p1", "p2", "p3"] {
        client.get_page(id).await.unwrap();
    }
    for id in ["b1", "b2", "b3", "b4"] {
        client.get_block(id).await.unwrap();
    }
    for id in ["b1", "b2", "b3", "b4"] {
        client.get_block(id).await.unwrap();
    }

    let stats = client.get_cache_stats().await;
    assert_eq!(stats.cache_sizes[&Partition::Pages], 2);
    assert_eq!(stats.cache_sizes[&Partition::Blocks], 4);
    assert_eq!(transport.calls_to(Method::Get, "blocks/b1"), 1);
}

#[tokio::test]
async fn test_disabled_caching_scenario() {
    let transport = ScriptedTransport::new();
    let client = client_with(
        ClientConfig {
            enable_caching: false,
            ..config()
        },
        &transport,
    );

    client.get_page("X").await.unwrap();
    client.get_page("X").await.unwrap();

    assert_eq!(transport.calls_to(Method::Get, "pages/X"), 2);
    let stats = client.get_cache_stats().await;
    assert!(!stats.enabled);
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 0);
    assert_eq!(stats.hit_rate_percent, 0.0);
}

// == Write-then-read consistency ==

#[tokio::test]
async fn test_read_after_update_is_fresh() {
    let transport = ScriptedTransport::new();
    let client = client(&transport);
    transport.respond("pages/p1", json!({"id": "p1", "version": 1}));
    transport.respond("pages/p1", json!({"id": "p1", "version": 2}));

    assert_eq!(client.get_page("p1").await.unwrap()["version"], 1);
    assert_eq!(client.get_page("p1").await.unwrap()["version"], 1);

    client
        .update_page("p1", json!({"Name": {"title": []}}))
        .await
        .unwrap();

    assert_eq!(client.get_page("p1").await.unwrap()["version"], 2);
}

#[tokio::test]
async fn test_create_page_in_data_source_drops_queries() {
    let transport = ScriptedTransport::new();
    let client = client(&transport);
    let params = QueryDataSourceParams::default().page_size(10);

    client.get_data_source("ds1").await.unwrap();
    client.query_data_source("ds1", &params).await.unwrap();
    client.query_data_source("ds2", &params).await.unwrap();

    client
        .create_page(&CreatePageRequest::new(Parent::data_source("ds1")))
        .await
        .unwrap();

    client.get_data_source("ds1").await.unwrap();
    client.query_data_source("ds1", &params).await.unwrap();
    client.query_data_source("ds2", &params).await.unwrap();

    assert_eq!(transport.calls_to(Method::Get, "data_sources/ds1"), 2);
    assert_eq!(transport.calls_to(Method::Post, "data_sources/ds1/query"), 2);
    assert_eq!(transport.calls_to(Method::Post, "data_sources/ds2/query"), 1);
}

#[tokio::test]
async fn test_append_children_drops_all_windows() {
    let transport = ScriptedTransport::new();
    let client = client(&transport);
    let first = BlockChildrenParams::default().page_size(25);
    let second = BlockChildrenParams::default().page_size(25).start_cursor("next");

    client.get_block_children("b1", &first).await.unwrap();
    client.get_block_children("b1", &second).await.unwrap();
    client
        .append_block_children("b1", vec![json!({"type": "divider", "divider": {}})])
        .await
        .unwrap();
    client.get_block_children("b1", &first).await.unwrap();
    client.get_block_children("b1", &second).await.unwrap();

    assert_eq!(transport.calls_to(Method::Get, "blocks/b1/children"), 4);
    assert_eq!(client.get_cache_stats().await.invalidations, 2);
}

#[tokio::test]
async fn test_delete_block_drops_parent_listing() {
    let transport = ScriptedTransport::new();
    let client = client(&transport);
    transport.respond(
        "blocks/b1",
        json!({"id": "b1", "parent": {"type": "block_id", "block_id": "b0"}}),
    );

    client.get_block("b1").await.unwrap();
    client
        .get_block_children("b0", &BlockChildrenParams::default())
        .await
        .unwrap();

    // The DELETE shares the path, so script its response too
    transport.respond(
        "blocks/b1",
        json!({"id": "b1", "archived": true, "parent": {"type": "block_id", "block_id": "b0"}}),
    );
    client.delete_block("b1").await.unwrap();

    client
        .get_block_children("b0", &BlockChildrenParams::default())
        .await
        .unwrap();
    assert_eq!(transport.calls_to(Method::Get, "blocks/b0/children"), 2);
    assert_eq!(client.get_cache_stats().await.invalidations, 2);
}

// == Failure paths ==

#[tokio::test]
async fn test_failed_write_keeps_cached_read() {
    let transport = ScriptedTransport::new();
    let client = client(&transport);
    client.get_page("p1").await.unwrap();

    transport.fail("pages/p1", 409);
    let err = client.update_page("p1", json!({})).await.unwrap_err();
    assert!(matches!(err, NotionError::Conflict(_)));

    client.get_page("p1").await.unwrap();
    let stats = client.get_cache_stats().await;
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.invalidations, 0);
    assert_eq!(transport.calls_to(Method::Get, "pages/p1"), 1);
}

#[tokio::test]
async fn test_failed_read_has_no_side_effect() {
    let transport = ScriptedTransport::new();
    let client = client(&transport);
    transport.fail("pages/missing", 404);

    let err = client.get_page("missing").await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));

    // The next read goes to the API again and is cached normally
    client.get_page("missing").await.unwrap();
    client.get_page("missing").await.unwrap();
    assert_eq!(transport.calls_to(Method::Get, "pages/missing"), 2);
}

#[tokio::test]
async fn test_client_side_validation_skips_transport() {
    let transport = ScriptedTransport::new();
    let client = client(&transport);
    let request = CreatePageRequest::new(Parent::page("p1"))
        .children(vec![json!({"type": "divider", "divider": {}})])
        .template(json!({"type": "default"}));

    let err = client.create_page(&request).await.unwrap_err();

    assert!(matches!(err, NotionError::Validation(_)));
    assert_eq!(transport.total_calls(), 0);
}

// == Keys ==

#[tokio::test]
async fn test_equal_queries_share_an_entry() {
    let transport = ScriptedTransport::new();
    let client = client(&transport);
    let a = QueryDataSourceParams::default().filter(json!({
        "and": [{"property": "Done", "checkbox": {"equals": true}}],
        "or": []
    }));
    let b = QueryDataSourceParams::default().filter(json!({
        "or": [],
        "and": [{"checkbox": {"equals": true}, "property": "Done"}]
    }));

    client.query_data_source("ds1", &a).await.unwrap();
    client.query_data_source("ds1", &b).await.unwrap();

    assert_eq!(transport.calls_to(Method::Post, "data_sources/ds1/query"), 1);
}

// == Statistics and clearing ==

#[tokio::test]
async fn test_clear_single_partition() {
    let transport = ScriptedTransport::new();
    let client = client(&transport);
    client.get_page("p1").await.unwrap();
    client.get_block("b1").await.unwrap();
    client.get_block("b1").await.unwrap();

    client.clear_cache(Some(Partition::Pages)).await;

    let stats = client.get_cache_stats().await;
    assert_eq!(stats.cache_sizes[&Partition::Pages], 0);
    assert_eq!(stats.cache_sizes[&Partition::Blocks], 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);

    client.clear_cache(None).await;
    let stats = client.get_cache_stats().await;
    assert_eq!(stats.total_requests, 0);
    assert!(stats.cache_sizes.values().all(|n| *n == 0));
}

#[tokio::test]
async fn test_partition_ttls_are_independent() {
    let transport = ScriptedTransport::new();
    let client = client_with(
        ClientConfig {
            cache_ttl_pages: 1,
            cache_ttl_blocks: 600,
            ..config()
        },
        &transport,
    );

    client.get_page("p1").await.unwrap();
    client.get_block("b1").await.unwrap();
    tokio::time::sleep(Duration::from_millis(1100)).await;
    client.get_page("p1").await.unwrap();
    client.get_block("b1").await.unwrap();

    assert_eq!(transport.calls_to(Method::Get, "pages/p1"), 2);
    assert_eq!(transport.calls_to(Method::Get, "blocks/b1"), 1);
}

#[tokio::test]
async fn test_clients_never_share_a_cache() {
    let transport = ScriptedTransport::new();
    let first = client(&transport);
    let second = client(&transport);

    first.get_page("p1").await.unwrap();
    second.get_page("p1").await.unwrap();

    assert_eq!(transport.calls_to(Method::Get, "pages/p1"), 2);
    assert_eq!(first.get_cache_stats().await.misses, 1);
    assert_eq!(second.get_cache_stats().await.misses, 1);
}

// == Concurrency ==

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reads_keep_counters_consistent() {
    let transport = ScriptedTransport::with_latency(Duration::from_millis(5));
    let client = client(&transport);

    let mut handles = Vec::new();
    for i in 0..64 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            let id = format!("p{}", i % 8);
            client.get_page(&id).await.unwrap();
            client.get_page(&id).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let stats = client.get_cache_stats().await;
    assert_eq!(stats.total_requests, 128);
    // Every miss reached the transport; every hit did not
    assert_eq!(stats.misses as usize, transport.total_calls());
    assert!(stats.hits >= 64);
    assert_eq!(stats.cache_sizes[&Partition::Pages], 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writes_and_reads() {
    let transport = ScriptedTransport::new();
    let client = client(&transport);

    let readers = (0..16).map(|_| {
        let client = client.clone();
        tokio::spawn(async move {
            for _ in 0..10 {
                client.get_page("shared").await.unwrap();
            }
        })
    });
    let writers = (0..4).map(|_| {
        let client = client.clone();
        tokio::spawn(async move {
            client.update_page("shared", json!({})).await.unwrap();
        })
    });
    let handles: Vec<_> = readers.chain(writers).collect();
    for handle in handles {
        handle.await.unwrap();
    }

    // A read after the last write is always served by a fresh fetch
    client.update_page("shared", json!({})).await.unwrap();
    let before = transport.calls_to(Method::Get, "pages/shared");
    client.get_page("shared").await.unwrap();
    assert_eq!(transport.calls_to(Method::Get, "pages/shared"), before + 1);
}

// == Properties ==

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // Reads of a random page sequence: API calls equal misses, and the
    // stats add up regardless of order.
    #[test]
    fn prop_client_calls_match_misses(ids in prop::collection::vec("[a-d]", 1..40)) {
        let transport = ScriptedTransport::new();
        let client = client_with(
            ClientConfig { cache_max_size: 3, ..config() },
            &transport,
        );

        tokio_test::block_on(async {
            for id in &ids {
                client.get_page(id).await.unwrap();
            }
        });
        let stats = tokio_test::block_on(client.get_cache_stats());

        prop_assert_eq!(stats.total_requests, ids.len() as u64);
        prop_assert_eq!(stats.misses as usize, transport.total_calls());
        prop_assert!(stats.cache_sizes[&Partition::Pages] <= 3);
    }
}

#[test]
fn test_client_is_shareable_across_tasks() {
    fn assert_shareable<T: Send + Sync + Clone + 'static>() {}
    assert_shareable::<notion_cache::NotionClient>();
}
