//! Owned engine initialization.
//!
//! An engine may take a while to load (a WASM or native module, a large
//! dictionary). The loader side publishes it exactly once; searches await the
//! [`EngineReadiness`] handle with a bounded timeout. Once that timeout has
//! elapsed without an engine the handle is permanently failed and every
//! later wait returns `EngineUnavailable` immediately.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info};

use super::MatchingEngine;
use crate::config::EngineConfig;
use crate::error::{MolSearchError, Result};

/// Create a connected loader/readiness pair.
pub fn engine_channel<E: MatchingEngine>() -> (EngineLoader<E>, EngineReadiness<E>) {
    let (tx, rx) = watch::channel(None);
    (
        EngineLoader { tx },
        EngineReadiness {
            rx,
            timeout: EngineConfig::READY_TIMEOUT,
            failed: Arc::new(AtomicBool::new(false)),
        },
    )
}

/// Publishing side of [`engine_channel`]. Consumed on publish.
pub struct EngineLoader<E> {
    tx: watch::Sender<Option<Arc<E>>>,
}

impl<E: MatchingEngine> EngineLoader<E> {
    /// Make the engine available to every waiting and future search.
    pub fn publish(self, engine: E) -> Arc<E> {
        let engine = Arc::new(engine);
        // Receivers may all be gone already; nothing to notify then.
        let _ = self.tx.send(Some(engine.clone()));
        info!("Structure matching engine ready");
        engine
    }
}

/// Awaitable handle to the engine. Clones share the same state.
pub struct EngineReadiness<E> {
    rx: watch::Receiver<Option<Arc<E>>>,
    timeout: Duration,
    failed: Arc<AtomicBool>,
}

impl<E> Clone for EngineReadiness<E> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
            timeout: self.timeout,
            failed: self.failed.clone(),
        }
    }
}

impl<E: MatchingEngine> EngineReadiness<E> {
    /// A handle that is already resolved.
    pub fn ready(engine: E) -> Self {
        let (loader, readiness) = engine_channel();
        loader.publish(engine);
        readiness
    }

    /// Run `init` on the tokio runtime and publish its engine when it resolves.
    ///
    /// An initialization error leaves the handle unresolved; waiters then hit
    /// the readiness timeout.
    pub fn spawn<F>(init: F) -> Self
    where
        F: Future<Output = Result<E>> + Send + 'static,
    {
        let (loader, readiness) = engine_channel();
        tokio::spawn(async move {
            match init.await {
                Ok(engine) => {
                    loader.publish(engine);
                }
                Err(e) => error!("Structure matching engine failed to initialize: {}", e),
            }
        });
        readiness
    }

    /// Override the readiness timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The engine, if it has been published.
    pub fn try_get(&self) -> Option<Arc<E>> {
        self.rx.borrow().clone()
    }

    /// True once a wait has timed out; searches stay disabled from then on.
    pub fn is_failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    /// Wait for the engine, up to the configured timeout.
    pub async fn wait(&self) -> Result<Arc<E>> {
        if self.is_failed() {
            return Err(self.unavailable());
        }
        if let Some(engine) = self.try_get() {
            return Ok(engine);
        }

        debug!("Waiting up to {:?} for structure matching engine", self.timeout);
        let mut rx = self.rx.clone();
        let waited = tokio::time::timeout(self.timeout, async move {
            rx.wait_for(|engine| engine.is_some())
                .await
                .ok()
                .and_then(|engine| engine.clone())
        })
        .await;

        match waited {
            Ok(Some(engine)) => Ok(engine),
            // Timed out, or the loader was dropped without publishing.
            _ => {
                self.failed.store(true, Ordering::SeqCst);
                error!(
                    "Structure matching engine not ready after {:?}; search disabled",
                    self.timeout
                );
                Err(self.unavailable())
            }
        }
    }

    fn unavailable(&self) -> MolSearchError {
        MolSearchError::EngineUnavailable {
            waited: self.timeout,
        }
    }
}
