use anyhow::Result;
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use storage_bridge::{frame, ModuleRegistry};
use storage_client::StorageClient;
use storage_core::KeyValueStore;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Semaphore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storage_stress=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let registry = Arc::new(ModuleRegistry::with_storage(KeyValueStore::new()));
    let client = StorageClient::new(&registry)?;

    tracing::info!("🧪 Storage Stress Run");
    println!();

    test_basic_operations(&client)?;
    test_parallel_set_get(&client).await?;
    test_data_isolation(&client).await?;
    test_contested_key(&client).await?;
    test_clear(&client)?;
    test_host_session(Arc::clone(&registry)).await?;

    println!();
    tracing::info!("✅ All checks passed!");

    Ok(())
}

/// Test basic SET/GET/REMOVE operations
fn test_basic_operations(client: &StorageClient) -> Result<()> {
    tracing::info!("Test: Basic Operations");

    let key = format!("basic-test-{}", uuid::Uuid::new_v4());
    let value = "hello world";

    assert!(client.set(&key, value)?, "SET should succeed");
    assert_eq!(client.get(&key)?.as_deref(), Some(value), "Value should match");
    assert!(client.has(&key)?, "Key should exist");

    assert!(client.remove(&key)?, "Key should be removed");
    assert!(!client.remove(&key)?, "Second remove should report absence");
    assert!(client.get(&key)?.is_none(), "Key should not be found after remove");
    assert!(!client.has(&key)?, "Key should not exist after remove");

    tracing::info!("   ✓ Basic operations work correctly");
    Ok(())
}

/// Test parallel SET and GET operations - verify no data mixing
async fn test_parallel_set_get(client: &StorageClient) -> Result<()> {
    let num_operations = 5_000;
    tracing::info!("Test: Parallel SET/GET ({} concurrent operations)", num_operations);

    let test_data: Vec<(String, String)> = (0..num_operations)
        .map(|i| {
            let key = format!("parallel-test-{}-{}", i, uuid::Uuid::new_v4());
            let value = format!("value-{}-{}", i, uuid::Uuid::new_v4());
            (key, value)
        })
        .collect();

    let start = Instant::now();
    let set_futures: Vec<_> = test_data
        .iter()
        .map(|(key, value)| {
            let client = client.clone();
            let key = key.clone();
            let value = value.clone();
            tokio::task::spawn_blocking(move || client.set(&key, &value))
        })
        .collect();

    for result in join_all(set_futures).await {
        assert!(result??, "SET should succeed");
    }
    let set_elapsed = start.elapsed();
    tracing::info!("   SET {} keys in {:?}", num_operations, set_elapsed);

    let get_start = Instant::now();
    let errors = Arc::new(AtomicUsize::new(0));

    let get_futures: Vec<_> = test_data
        .iter()
        .map(|(key, expected_value)| {
            let client = client.clone();
            let key = key.clone();
            let expected_value = expected_value.clone();
            let errors = Arc::clone(&errors);
            tokio::task::spawn_blocking(move || {
                let value = client.get(&key)?;
                if value.as_deref() != Some(expected_value.as_str()) {
                    tracing::error!(
                        "Value mismatch for key {}: expected '{}', got '{:?}'",
                        key,
                        expected_value,
                        value
                    );
                    errors.fetch_add(1, Ordering::SeqCst);
                }
                Ok::<_, storage_client::Error>(())
            })
        })
        .collect();

    for result in join_all(get_futures).await {
        result??;
    }

    let get_elapsed = get_start.elapsed();
    tracing::info!("   GET {} keys in {:?}", num_operations, get_elapsed);
    tracing::info!(
        "   Throughput: {:.0} ops/sec (SET), {:.0} ops/sec (GET)",
        num_operations as f64 / set_elapsed.as_secs_f64(),
        num_operations as f64 / get_elapsed.as_secs_f64()
    );

    assert_eq!(errors.load(Ordering::SeqCst), 0, "No errors should occur");
    assert_eq!(client.size()?, num_operations);
    tracing::info!("   ✓ All {} values verified correctly", num_operations);

    client.clear()?;
    Ok(())
}

/// Test that concurrent writers on different keys don't interfere
async fn test_data_isolation(client: &StorageClient) -> Result<()> {
    tracing::info!("Test: Data Isolation (concurrent writes to different keys)");

    let num_workers = 50;
    let ops_per_worker = 20;
    let semaphore = Arc::new(Semaphore::new(16)); // Limit concurrent workers

    let worker_futures: Vec<_> = (0..num_workers)
        .map(|worker_id| {
            let client = client.clone();
            let semaphore = Arc::clone(&semaphore);

            async move {
                let _permit = semaphore.acquire_owned().await?;
                let written = tokio::task::spawn_blocking(move || {
                    let mut written = HashMap::new();
                    for op in 0..ops_per_worker {
                        let key = format!("isolation-worker{}-op{}", worker_id, op);
                        let value = format!("worker{}-value{}-{}", worker_id, op, uuid::Uuid::new_v4());
                        client.set(&key, &value)?;
                        written.insert(key, value);
                    }
                    Ok::<_, storage_client::Error>(written)
                })
                .await??;

                Ok::<_, anyhow::Error>(written)
            }
        })
        .collect();

    let mut expected = HashMap::new();
    for written in join_all(worker_futures).await {
        expected.extend(written?);
    }

    let mut errors = 0;
    for (key, expected_value) in &expected {
        let value = client.get(key)?;
        if value.as_deref() != Some(expected_value.as_str()) {
            tracing::error!(
                "Isolation failure: key={}, expected={}, got={:?}",
                key,
                expected_value,
                value
            );
            errors += 1;
        }
    }

    assert_eq!(errors, 0, "No isolation failures should occur");

    let keys = client.get_all_keys()?;
    let unique: HashSet<&String> = keys.iter().collect();
    assert_eq!(unique.len(), keys.len(), "Key listing should have no duplicates");
    assert_eq!(keys.len(), client.size()?, "Size should match key count");
    assert_eq!(keys.len(), expected.len());

    tracing::info!("   ✓ {} keys verified, no cross-contamination", expected.len());

    client.clear()?;
    Ok(())
}

/// Test many writers racing on a single key
async fn test_contested_key(client: &StorageClient) -> Result<()> {
    tracing::info!("Test: Contested Key");

    let key = format!("contested-{}", uuid::Uuid::new_v4());
    let writers: Vec<_> = (0..32)
        .map(|writer_id| {
            let client = client.clone();
            let key = key.clone();
            tokio::task::spawn_blocking(move || {
                for i in 0..100 {
                    client.set(&key, &format!("writer{}-{}", writer_id, i))?;
                }
                Ok::<_, storage_client::Error>(())
            })
        })
        .collect();

    for result in join_all(writers).await {
        result??;
    }

    assert_eq!(client.size()?, 1, "Only one entry should exist");
    let value = client.get(&key)?.unwrap_or_default();
    assert!(value.ends_with("-99"), "Final value should be some writer's last write");

    tracing::info!("   ✓ Contested key holds '{}'", value);

    client.clear()?;
    Ok(())
}

/// Test that clear empties the store
fn test_clear(client: &StorageClient) -> Result<()> {
    tracing::info!("Test: Clear");

    client.set("k1", "v1")?;
    client.set("k2", "v2")?;
    client.set("k3", "v3")?;
    assert_eq!(client.size()?, 3);

    client.clear()?;

    assert_eq!(client.size()?, 0);
    assert!(client.get_all_keys()?.is_empty());
    for key in ["k1", "k2", "k3"] {
        assert!(client.get(key)?.is_none());
    }

    tracing::info!("   ✓ Store empty after clear");
    Ok(())
}

/// Test the line-framed host session in-process
async fn test_host_session(registry: Arc<ModuleRegistry>) -> Result<()> {
    tracing::info!("Test: Host Session (line-framed invocations)");

    let (host_side, test_side) = tokio::io::duplex(4096);
    let (host_reader, host_writer) = tokio::io::split(host_side);

    let host = tokio::spawn(async move {
        frame::serve(&registry, BufReader::new(host_reader), host_writer).await
    });

    let (test_reader, mut test_writer) = tokio::io::split(test_side);
    let mut replies = BufReader::new(test_reader).lines();

    let requests = [
        serde_json::json!({"id": 1, "module": "Storage", "method": "set", "args": ["session", "open"]}),
        serde_json::json!({"id": 2, "module": "Storage", "method": "get", "args": ["session"]}),
        serde_json::json!({"id": 3, "module": "Storage", "method": "getAllKeys"}),
        serde_json::json!({"id": 4, "module": "Storage", "method": "remove", "args": ["session"]}),
    ];
    let expected = [
        serde_json::json!(true),
        serde_json::json!("open"),
        serde_json::json!(["session"]),
        serde_json::json!(true),
    ];

    for (request, expected) in requests.iter().zip(expected.iter()) {
        let mut line = request.to_string();
        line.push('\n');
        test_writer.write_all(line.as_bytes()).await?;

        let reply = replies
            .next_line()
            .await?
            .ok_or_else(|| anyhow::anyhow!("host closed the session early"))?;
        let reply: frame::Reply = serde_json::from_str(&reply)?;

        assert!(reply.ok, "Invocation {} should succeed", request["id"]);
        assert_eq!(reply.id.as_ref(), request.get("id"));
        assert_eq!(reply.result.as_ref(), Some(expected));
    }

    test_writer.shutdown().await?;
    let served = host.await??;
    assert_eq!(served, requests.len());

    tracing::info!("   ✓ {} framed invocations answered", served);
    Ok(())
}
