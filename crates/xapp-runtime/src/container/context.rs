//! # xApp Context
//!
//! Wires the lifecycle managers and the indication processor to one
//! transport, one codec and one metric sink.
//!
//! ```text
//!            RicTransport ◄──── SubscriptionManager ──cleanup──► DeletionManager
//!                 ▲                      ▲                             ▲
//!   codec ────────┼──────────────────────┴─────────────┬───────────────┘
//!                 │                                    │
//!            MetricSink ◄──── IndicationProcessor ◄────┘
//! ```

use std::sync::Arc;

use kpm_01_subscription::{
    DeletionApi, DeletionManager, ExpiryCleanup, LifecycleRecorder, SubscriptionCodec,
    SubscriptionManager,
};
use kpm_02_indication::{IndicationCodec, IndicationProcessor, IndicationRecorder, MetricSink};
use shared_bus::RicTransport;
use tracing::info;

use crate::container::config::{ConfigError, XappConfig};
use crate::dispatcher::MessageDispatcher;

/// Every long-lived component of the xApp.
pub struct XappContext {
    pub config: XappConfig,
    pub transport: Arc<dyn RicTransport>,
    pub subscriptions: Arc<SubscriptionManager>,
    pub deletions: Arc<DeletionManager>,
    pub indications: Arc<IndicationProcessor>,
}

impl XappContext {
    /// Validate `config` and build every component.
    pub fn build<C, R>(
        config: XappConfig,
        transport: Arc<dyn RicTransport>,
        codec: Arc<C>,
        sink: Arc<dyn MetricSink>,
        recorder: Arc<R>,
    ) -> Result<Self, ConfigError>
    where
        C: SubscriptionCodec + IndicationCodec + 'static,
        R: LifecycleRecorder + IndicationRecorder + 'static,
    {
        config.validate()?;

        let deletions = Arc::new(
            DeletionManager::new(codec.clone(), transport.clone(), &config.lifecycle)
                .with_recorder(recorder.clone()),
        );

        let mut subscriptions =
            SubscriptionManager::new(codec.clone(), transport.clone(), config.lifecycle.clone())
                .with_recorder(recorder.clone());
        if config.lifecycle.expiry_cleanup == ExpiryCleanup::SendDelete {
            subscriptions = subscriptions.with_cleanup(deletions.clone() as Arc<dyn DeletionApi>);
        }

        let indications =
            Arc::new(IndicationProcessor::new(codec, sink).with_recorder(recorder));

        info!(
            nodes = config.nodes.len(),
            create_expiry_secs = config.lifecycle.create_expiry.as_secs(),
            max_send_attempts = config.lifecycle.max_send_attempts,
            expiry_cleanup = ?config.lifecycle.expiry_cleanup,
            "xApp context built"
        );

        Ok(Self {
            config,
            transport,
            subscriptions: Arc::new(subscriptions),
            deletions,
            indications,
        })
    }

    /// Dispatcher routing to this context's handlers.
    pub fn dispatcher(&self) -> MessageDispatcher {
        MessageDispatcher::new(
            self.subscriptions.clone(),
            self.deletions.clone(),
            self.indications.clone(),
        )
    }
}
