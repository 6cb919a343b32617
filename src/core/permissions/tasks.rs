//! Background credential check task

use super::traits::AuthorizedHandler;
use super::types::AccessState;
use super::watcher::PermissionsWatcher;
use crate::utils::error::{Result, WalletError};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

impl PermissionsWatcher {
    /// Start watching `did`
    ///
    /// Checks once right away and then every configured interval until
    /// [`stop`](Self::stop). Starting an already running watcher only updates
    /// the identity and handler.
    pub async fn start(
        &self,
        did: impl Into<String>,
        on_authorized: Option<Arc<dyn AuthorizedHandler>>,
    ) -> Result<()> {
        if self.is_stopped() {
            return Err(WalletError::internal("Permissions watcher was stopped"));
        }

        self.watch(did).await;
        if let Some(handler) = on_authorized {
            self.set_authorized_handler(handler);
        }

        let mut task = self.task.lock();
        if task.is_some() {
            debug!("Permissions watcher already running");
            return Ok(());
        }

        let watcher = self.clone();
        let interval = self.config.check_interval();
        *task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                // The first tick completes immediately
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = watcher.shutdown.notified() => break,
                }

                if watcher.is_stopped() {
                    break;
                }

                match watcher.check_access_and_act().await {
                    Ok(outcome) => debug!("Credential check finished: {:?}", outcome),
                    // A failed cycle never stops the polling
                    Err(e) if e.is_transient() => warn!("Credential check failed: {}", e),
                    Err(e) => error!("Credential check failed: {}", e),
                }
            }

            debug!("Permissions watcher task stopped");
        }));

        info!("Permissions will be checked once every {:?}", interval);
        Ok(())
    }

    /// Stop polling; no further transitions happen afterwards
    ///
    /// A check already in flight finishes, but its result is dropped.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }
        info!("Stopping permissions watcher");
        self.shutdown.notify_one();
        *self.status.write() = AccessState::Stopped;
    }

    /// Stop polling and wait for the background task to exit
    pub async fn shutdown(&self) {
        self.stop();
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!("Permissions watcher task ended abnormally: {}", e);
            }
        }
    }

    /// Whether the background task is running
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}
