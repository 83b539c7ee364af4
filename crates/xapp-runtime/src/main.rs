//! # KPIMON
//!
//! RIC xApp that subscribes to E2SM-KPM reports on every configured node and
//! writes the reported measurements to a time-series database.
//!
//! The process wires an in-process message router. An external router
//! delivers inbound messages through an `InboundSender` and implements
//! `RicTransport` for outbound ones.

use std::sync::Arc;

use anyhow::{Context, Result};
use kpm_02_indication::MetricSink;
use kpm_telemetry::{encode_metrics, init_telemetry, TelemetryConfig};
use shared_bus::{inbound_channel, InMemoryTransport};
use tracing::{debug, info, warn};

use xapp_runtime::adapters::{InfluxSink, LogSink, PrometheusRecorder, SerdeCodec};
use xapp_runtime::{XappConfig, XappContext, XappRuntime};

fn build_sink(config: &XappConfig) -> Result<Arc<dyn MetricSink>> {
    match &config.sink.addr {
        Some(addr) => {
            let sink = InfluxSink::new(&config.sink).context("Failed to create InfluxDB sink")?;
            info!(addr = %addr, url = %sink.write_url(), "Writing metric points to InfluxDB");
            Ok(Arc::new(sink))
        }
        None => {
            warn!("influxAddr not set, metric points will only be logged");
            Ok(Arc::new(LogSink::new(config.sink.precision)))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    let _telemetry_guard = init_telemetry(&telemetry).context("Failed to initialize telemetry")?;

    info!("===========================================");
    info!("  KPIMON xApp v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let config = XappConfig::from_env().context("Failed to load configuration")?;
    let sink = build_sink(&config)?;

    let transport = Arc::new(InMemoryTransport::new());
    let (inbound_tx, inbound) = inbound_channel(config.inbound_capacity);

    let context = XappContext::build(
        config,
        transport,
        Arc::new(SerdeCodec::new()),
        sink,
        Arc::new(PrometheusRecorder),
    )
    .context("Invalid configuration")?;

    for node in &context.config.nodes {
        info!(node = %node, "Target node");
    }

    let runtime = Arc::new(XappRuntime::new(context));
    let dispatcher = runtime.spawn_dispatcher(inbound);
    let subscriptions = runtime.spawn_subscriptions();

    info!("KPIMON is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown().await;
    drop(inbound_tx);

    if !subscriptions.is_finished() {
        subscriptions.abort();
    }
    match dispatcher.await {
        Ok(stats) => info!(
            received = stats.received,
            discarded = stats.discarded,
            "Dispatcher drained"
        ),
        Err(e) => warn!(error = %e, "Dispatcher task ended abnormally"),
    }

    match encode_metrics() {
        Ok(text) => debug!(metrics = %text, "Final process metrics"),
        Err(e) => warn!(error = %e, "Could not encode process metrics"),
    }

    Ok(())
}
