//! # xApp Runtime
//!
//! Owns the context and the shutdown channel, and starts the two concurrent
//! activities of the xApp:
//!
//! 1. The message dispatcher loop over the inbound queue.
//! 2. After the startup delay, one Create procedure per configured node.

use std::sync::Arc;
use std::time::Duration;

use kpm_01_subscription::{ArmedProcedure, LifecycleError, SubscriptionApi};
use kpm_telemetry::log_node_event;
use shared_bus::InboundQueue;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{error, info};

use crate::container::XappContext;
use crate::dispatcher::DispatcherSnapshot;

const SUBSYSTEM: &str = "runtime";

/// Time given to in-flight work after the shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Result of one node's Create procedure start.
pub type StartResult = (String, Result<ArmedProcedure, LifecycleError>);

pub struct XappRuntime {
    context: Arc<XappContext>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl XappRuntime {
    pub fn new(context: XappContext) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            context: Arc::new(context),
            shutdown_tx,
            shutdown_rx,
        }
    }

    pub fn context(&self) -> Arc<XappContext> {
        Arc::clone(&self.context)
    }

    /// Receiver that flips to `true` on shutdown.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// Run the dispatcher over `queue` in its own task.
    pub fn spawn_dispatcher(&self, queue: InboundQueue) -> JoinHandle<DispatcherSnapshot> {
        let dispatcher = self.context.dispatcher();
        tokio::spawn(dispatcher.run(queue, self.shutdown_rx.clone()))
    }

    /// Start a Create procedure toward every configured node, concurrently.
    ///
    /// Resolves once every node's request was accepted by the transport or
    /// given up on. Timers keep running after this returns.
    pub async fn subscribe_all(&self) -> Vec<StartResult> {
        let func_id = self.context.config.func_id;
        let mut set = JoinSet::new();

        for node in self.context.config.nodes.iter().cloned() {
            let subscriptions = Arc::clone(&self.context.subscriptions);
            set.spawn(async move {
                let ran_name = node.ran_name.clone();
                let result = subscriptions.start_subscription(node, func_id).await;
                (ran_name, result)
            });
        }

        let mut results = Vec::with_capacity(self.context.config.nodes.len());
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((ran_name, result)) => {
                    match &result {
                        Ok(armed) => log_node_event!(
                            info,
                            SUBSYSTEM,
                            "Subscription request sent",
                            ran_name,
                            attempts = armed.attempts
                        ),
                        Err(e) => log_node_event!(
                            error,
                            SUBSYSTEM,
                            "Subscription request not sent",
                            ran_name,
                            error = %e
                        ),
                    }
                    results.push((ran_name, result));
                }
                Err(e) => error!(error = %e, "Subscription task panicked"),
            }
        }
        results
    }

    /// Wait for the startup delay, then `subscribe_all`, in its own task.
    /// A shutdown during the delay skips the subscriptions.
    pub fn spawn_subscriptions(self: &Arc<Self>) -> JoinHandle<Vec<StartResult>> {
        let runtime = Arc::clone(self);
        let mut shutdown = self.shutdown_rx.clone();
        let delay = self.context.config.startup_delay;

        tokio::spawn(async move {
            info!(delay_secs = delay.as_secs(), "Waiting before subscribing");
            tokio::select! {
                _ = tokio::time::sleep(delay) => runtime.subscribe_all().await,
                _ = shutdown.changed() => {
                    info!("Shutdown before subscriptions were sent");
                    Vec::new()
                }
            }
        })
    }

    /// Signal every task to stop and give them a moment to finish.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        tokio::time::sleep(SHUTDOWN_GRACE).await;
        info!("Shutdown complete");
    }
}
