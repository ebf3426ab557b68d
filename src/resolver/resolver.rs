use std::sync::Arc;

use anyhow::Result;
use log::{debug, warn};
use parking_lot::Mutex;
use tokio::{sync::watch, task::JoinHandle};

use super::availability::{resolve, CallState, PoolResolution};
use crate::{
    cache::SharedPoolCache,
    ledger::{read_liquidity, read_slot0, LedgerContext, Slot0},
    pool::{normalize, PoolKey, PoolRequest},
};

/// Read trackers for the current request.
///
/// `generation` is bumped every time a new pair of reads is issued (or the
/// trackers are reset); completions carrying an older generation are dropped.
#[derive(Debug, Default)]
struct Tracker {
    generation: u64,
    key: Option<Arc<PoolKey>>,
    slot0: Option<CallState<Slot0>>,
    liquidity: Option<CallState<u128>>,
}

/// State shared between the resolver and its in-flight read tasks.
struct Shared {
    tracker: Mutex<Tracker>,
    cache: SharedPoolCache,
    resolution: watch::Sender<PoolResolution>,
}

impl Shared {
    /// Recompute the resolution from `tracker` and notify subscribers if it changed.
    ///
    /// Called with the tracker lock held so a transition and its published
    /// resolution are observed together.
    fn publish(&self, tracker: &Tracker) {
        let resolution = resolve(
            tracker.key.as_deref(),
            tracker.slot0.as_ref(),
            tracker.liquidity.as_ref(),
            &mut self.cache.lock(),
        );

        self.resolution.send_if_modified(|current| {
            if *current == resolution {
                return false;
            }
            *current = resolution;
            true
        });
    }

    fn complete(&self, generation: u64, outcome: Result<(Slot0, u128)>) {
        let mut tracker = self.tracker.lock();

        if tracker.generation != generation {
            debug!(
                "Discarding pool reads from generation {} (current {})",
                generation, tracker.generation
            );
            return;
        }

        match outcome {
            Ok((slot0, liquidity)) => {
                tracker.slot0 = Some(CallState::resolved(slot0));
                tracker.liquidity = Some(CallState::resolved(liquidity));
            },
            Err(e) => {
                // A partial snapshot is unusable, so both reads are invalidated
                if let Some(key) = &tracker.key {
                    warn!("Pool reads failed for {}: {:#}", key.pool_id(), e);
                }
                tracker.slot0 = Some(CallState::failed());
                tracker.liquidity = Some(CallState::failed());
            },
        }

        self.publish(&tracker);
    }
}

/// Resolves a requested pool into its current [`PoolResolution`].
///
/// Each change of request or ledger context normalizes the request, reads
/// slot0 and liquidity concurrently through the StateView contract, and
/// publishes the outcome. Reads issued for a superseded request never
/// overwrite the state of a newer one.
pub struct PoolResolver {
    context: Option<LedgerContext>,
    request: PoolRequest,
    key: Option<PoolKey>,
    shared: Arc<Shared>,
}

impl PoolResolver {
    pub fn new(cache: SharedPoolCache, context: Option<LedgerContext>) -> Self {
        let (resolution, _) = watch::channel(PoolResolution::invalid());

        Self {
            context,
            request: PoolRequest::default(),
            key: None,
            shared: Arc::new(Shared {
                tracker: Mutex::new(Tracker::default()),
                cache,
                resolution,
            }),
        }
    }

    /// Latest resolution for the current request.
    pub fn current(&self) -> PoolResolution {
        self.shared.resolution.borrow().clone()
    }

    /// Receiver notified on every resolution change.
    pub fn subscribe(&self) -> watch::Receiver<PoolResolution> {
        self.shared.resolution.subscribe()
    }

    pub fn request(&self) -> &PoolRequest {
        &self.request
    }

    pub fn context(&self) -> Option<&LedgerContext> {
        self.context.as_ref()
    }

    /// Change the requested pool.
    ///
    /// Reads are only reissued when the request normalizes to a different
    /// pool. Returns the handle of the spawned read task, if any.
    pub fn set_request(&mut self, request: PoolRequest) -> Option<JoinHandle<()>> {
        if request == self.request {
            return None;
        }

        let key = normalize(&request);
        self.request = request;

        if key == self.key {
            return None;
        }

        self.key = key;
        self.restart()
    }

    /// Change the ledger connection. `None` resets the resolver to `Invalid`.
    pub fn set_context(&mut self, context: Option<LedgerContext>) -> Option<JoinHandle<()>> {
        let unchanged = match (&self.context, &context) {
            (Some(current), Some(next)) => current.same_target(next),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return None;
        }

        self.context = context;
        self.restart()
    }

    /// Reissue both reads for the current request, e.g. on a new block.
    pub fn refresh(&self) -> Option<JoinHandle<()>> {
        self.restart()
    }

    fn restart(&self) -> Option<JoinHandle<()>> {
        let key = self
            .key
            .map(|key| self.shared.cache.lock().canonical_key(key));

        let mut tracker = self.shared.tracker.lock();
        tracker.generation += 1;
        tracker.key = key.clone();

        let (Some(context), Some(key)) = (self.context.clone(), key) else {
            tracker.slot0 = None;
            tracker.liquidity = None;
            self.shared.publish(&tracker);
            return None;
        };

        tracker.slot0 = Some(CallState::loading());
        tracker.liquidity = Some(CallState::loading());
        self.shared.publish(&tracker);

        let generation = tracker.generation;
        drop(tracker);

        let pool_id = key.pool_id();
        debug!(
            "Reading pool {} on chain {} (generation {})",
            pool_id, context.chain_id, generation
        );

        let shared = self.shared.clone();
        Some(tokio::spawn(async move {
            let outcome = futures::try_join!(
                read_slot0(&context, pool_id),
                read_liquidity(&context, pool_id)
            );
            shared.complete(generation, outcome);
        }))
    }
}
