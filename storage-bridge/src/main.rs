use storage_bridge::{frame, HostConfig, ModuleRegistry};
use storage_core::KeyValueStore;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries reply frames
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storage_host=info,storage_bridge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = HostConfig::from_env();
    let store = KeyValueStore::with_config(config.store_config());
    let registry = ModuleRegistry::with_storage(store);

    tracing::info!("storage host ready, modules: {:?}", registry.module_names());
    tracing::info!(
        "   initial capacity: {}, shards: {}",
        config.initial_capacity,
        config
            .shard_amount
            .map_or_else(|| "default".to_string(), |n| n.to_string())
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let served = frame::serve(&registry, stdin, tokio::io::stdout()).await?;

    tracing::info!("session closed after {} invocations", served);
    Ok(())
}
