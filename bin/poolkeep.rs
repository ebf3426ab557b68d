use std::{sync::Arc, time::Duration};

use anyhow::{bail, Context};
use jemallocator::Jemalloc;
use log::{error, info, warn};
use simple_logger::SimpleLogger;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use poolkeep::{
    config::WatchedPool, LedgerContext, PoolAvailability, PoolCache, PoolRequest, PoolResolver,
    RpcLedgerReader, Settings,
};

#[tokio::main()]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = Arc::new(
        Settings::new()
            .context("Failed to load config.yaml. Please ensure it exists and is valid")?,
    );

    SimpleLogger::new()
        .with_level(settings.log_level())
        .init()
        .context("Failed to install logger")?;

    let ledger = &settings.ledger;
    let reader = Arc::new(
        RpcLedgerReader::new(
            &ledger.rpc_url,
            ledger.call_timeout_ms.map(Duration::from_millis),
        )
        .context("Failed to create RPC reader")?,
    );

    match reader.chain_id().await {
        Ok(chain_id) if chain_id != ledger.chain_id => {
            bail!(
                "RPC endpoint serves chain {} but config expects chain {}",
                chain_id,
                ledger.chain_id
            );
        },
        Ok(_) => {},
        Err(e) => warn!("Could not verify chain id: {:#}", e),
    }

    if settings.pools.is_empty() {
        warn!("No pools configured - nothing to resolve");
        return Ok(());
    }

    let context = LedgerContext::new(ledger.chain_id, ledger.state_view_address, reader);

    // One cache shared by every resolver in this process
    let cache = PoolCache::shared(settings.resolver.cache_capacity);

    let cancellation_token = CancellationToken::new();

    let mut handles = Vec::with_capacity(settings.pools.len());
    for watched in settings.pools.iter().cloned() {
        let resolver = PoolResolver::new(cache.clone(), Some(context.clone()));
        let interval = Duration::from_millis(settings.resolver.refresh_interval_ms);
        let token = cancellation_token.child_token();
        let request = watched.chain_request(ledger);

        handles.push(tokio::spawn(async move {
            watch_pool(watched, request, resolver, interval, token).await;
        }));
    }

    info!("Resolving {} pool(s). Press Ctrl+C to stop.", handles.len());

    wait_for_shutdown().await?;

    info!("Stopping pool watchers...");
    cancellation_token.cancel();

    for handle in handles {
        if let Err(e) = handle.await {
            error!("Pool watcher panicked: {}", e);
        }
    }

    info!("All pool watchers stopped");
    Ok(())
}

/// Resolve one pool and re-read it every `interval` until cancelled.
async fn watch_pool(
    watched: WatchedPool,
    request: PoolRequest,
    mut resolver: PoolResolver,
    interval: Duration,
    cancellation_token: CancellationToken,
) {
    let mut updates = resolver.subscribe();
    let mut in_flight: Option<JoinHandle<()>> = resolver.set_request(request);
    let mut ticker = tokio::time::interval(interval);
    // First tick completes immediately; the initial read was issued above
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancellation_token.cancelled() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let resolution = updates.borrow_and_update().clone();
                match (resolution.availability, resolution.pool) {
                    (PoolAvailability::Exists, Some(pool)) => {
                        let json = serde_json::to_string(&*pool).unwrap_or_default();
                        info!("[{}] {} id={} {}", watched.name, resolution.availability, pool.pool_id(), json);
                    },
                    (availability, _) => info!("[{}] {}", watched.name, availability),
                }
            },
            _ = ticker.tick() => {
                // A hung read keeps its pool in LOADING; skip refreshes until it settles
                if in_flight.as_ref().is_some_and(|h| !h.is_finished()) {
                    warn!("[{}] Previous read still in flight, skipping refresh", watched.name);
                    continue;
                }
                in_flight = resolver.refresh();
            },
        }
    }
}

async fn wait_for_shutdown() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm_stream =
            signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal (Ctrl+C), exiting gracefully...");
            },
            _ = sigterm_stream.recv() => {
                info!("Received SIGTERM, exiting gracefully...");
            },
        };
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl+C")?;
        info!("Received shutdown signal (Ctrl+C), exiting gracefully...");
    }

    Ok(())
}
