//! # Indication Processor
//!
//! Handles one `RIC_INDICATION` at a time:
//!
//! 1. Decode the E2AP envelope, then the E2SM-KPM header, then the message.
//!    Any decode failure discards this message only.
//! 2. Log the header node identity. The header never produces metrics.
//! 3. Flatten the report into metric points and write each to the sink.
//!    A failed write is logged and the remaining points are still written.
//!
//! The decoded tree lives only for the duration of `handle`.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use shared_types::RicMessage;
use tracing::{debug, info, warn};

use crate::domain::{
    flatten_report, FlattenedReport, IndicationHeader, IndicationReport, RicIndication,
};
use crate::error::{DecodeStage, IndicationError};
use crate::metrics::{IndicationRecorder, NoOpRecorder, ProcessorSnapshot, ProcessorStats};
use crate::ports::{IndicationApi, IndicationCodec, IndicationSummary, MetricSink};

pub struct IndicationProcessor {
    codec: Arc<dyn IndicationCodec>,
    sink: Arc<dyn MetricSink>,
    stats: ProcessorStats,
    recorder: Arc<dyn IndicationRecorder>,
}

impl IndicationProcessor {
    pub fn new(codec: Arc<dyn IndicationCodec>, sink: Arc<dyn MetricSink>) -> Self {
        Self {
            codec,
            sink,
            stats: ProcessorStats::new(),
            recorder: Arc::new(NoOpRecorder),
        }
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn IndicationRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn stats(&self) -> ProcessorSnapshot {
        self.stats.snapshot()
    }

    fn decode(
        &self,
        message: &RicMessage,
    ) -> Result<(RicIndication, IndicationHeader, IndicationReport), IndicationError> {
        if message.payload.is_empty() {
            return Err(IndicationError::EmptyPayload {
                ran_name: message.ran_name().to_string(),
            });
        }

        let indication = self
            .codec
            .decode_ric_indication(&message.payload)
            .map_err(|e| IndicationError::from_decode(DecodeStage::Envelope, e))?;
        log_envelope(message.ran_name(), &indication);

        let header = self
            .codec
            .decode_indication_header(&indication.header)
            .map_err(|e| IndicationError::from_decode(DecodeStage::Header, e))?;
        log_header(message.ran_name(), &header);

        let report = self
            .codec
            .decode_indication_message(&indication.message)
            .map_err(|e| IndicationError::from_decode(DecodeStage::Message, e))?;

        Ok((indication, header, report))
    }

    async fn emit(&self, ran_name: &str, flat: &FlattenedReport) -> (usize, usize) {
        let mut written = 0;
        let mut failures = 0;
        for (item, point) in flat.points() {
            match self.sink.write(point).await {
                Ok(()) => written += 1,
                Err(e) => {
                    failures += 1;
                    self.stats.record_sink_failure();
                    self.recorder.record_sink_failure();
                    warn!(
                        ran_name,
                        item = item.index,
                        measurement = %item.measurement,
                        tags = ?point.tags,
                        error = %e,
                        "Failed to write metric point"
                    );
                }
            }
        }
        (written, failures)
    }

    fn finish(&self, result: &'static str, started: Instant) {
        let elapsed = started.elapsed();
        self.stats.record_indication(result, elapsed);
        self.recorder.record_indication(result, elapsed);
    }
}

#[async_trait]
impl IndicationApi for IndicationProcessor {
    async fn handle(&self, message: &RicMessage) -> Result<IndicationSummary, IndicationError> {
        let started = Instant::now();
        let ran_name = message.ran_name();
        debug!(ran_name, sub_id = message.sub_id, "RIC_INDICATION received");

        let (_indication, _header, report) = match self.decode(message) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(ran_name, error = %e, "Discarding RIC_INDICATION");
                self.finish(e.result_label(), started);
                return Err(e);
            }
        };

        let flat = flatten_report(&report, Utc::now());
        log_report(ran_name, &report, &flat);

        let (written, sink_failures) = self.emit(ran_name, &flat).await;
        self.stats.record_points_emitted(written);
        self.recorder.record_points_emitted(written);
        self.finish("ok", started);

        Ok(IndicationSummary {
            report_format: report.format(),
            points_emitted: written,
            sink_failures,
            measurement_records: flat.record_count(),
            test_conditions: flat.test_condition_count(),
        })
    }
}

fn log_envelope(ran_name: &str, ind: &RicIndication) {
    debug!(
        ran_name,
        request_id = ind.request_id,
        request_seq_num = ind.request_seq_num,
        func_id = ind.func_id,
        action_id = ind.action_id,
        indication_sn = ?ind.indication_sn,
        indication_type = ind.indication_type.as_str(),
        indication_header = %hex::encode(&ind.header),
        indication_message = %hex::encode(&ind.message),
        call_process_id = ?ind.call_process_id.as_ref().map(hex::encode),
        "RIC_INDICATION envelope"
    );
}

fn log_header(ran_name: &str, header: &IndicationHeader) {
    let IndicationHeader::Format1(f1) = header;
    match header.node_context() {
        Some(ctx) => info!(
            ran_name,
            format = header.format(),
            node_type = ctx.variant,
            id_kind = ctx.id_kind,
            plmn_id = %ctx.plmn_hex,
            node_id = %ctx.node_id_hex,
            bits_unused = ctx.bits_unused,
            cu_up_id = ?ctx.cu_up_id,
            du_id = ?ctx.du_id,
            "Indication header"
        ),
        None => info!(ran_name, format = header.format(), "Indication header without node identity"),
    }
    debug!(
        ran_name,
        collect_start_time = ?f1.collect_start_time.as_ref().map(hex::encode),
        file_format_version = ?f1.file_format_version,
        sender_name = ?f1.sender_name,
        sender_type = ?f1.sender_type,
        vendor_name = ?f1.vendor_name,
        "Indication header attributes"
    );
}

fn log_report(ran_name: &str, report: &IndicationReport, flat: &FlattenedReport) {
    info!(
        ran_name,
        format = report.format(),
        granularity_period = ?report.granularity_period(),
        subscription_id = ?report.subscription_id(),
        cell_object_id = ?report.cell_object_id(),
        measurements = flat.items.len(),
        points = flat.point_count(),
        "Indication message"
    );

    for item in &flat.items {
        debug!(
            ran_name,
            item = item.index,
            measurement = %item.measurement,
            points = item.points.len(),
            test_conditions = item.test_conditions.len(),
            matched_ues = item.matched_ue_ids.len(),
            "Measurement"
        );
        for point in &item.points {
            debug!(
                ran_name,
                item = item.index,
                measurement = %item.measurement,
                tags = ?point.tags,
                fields = ?point.fields,
                "Metric point"
            );
        }
        for (index, test) in item.test_conditions.iter().enumerate() {
            info!(
                ran_name,
                item = item.index,
                measurement = %item.measurement,
                index,
                test_type = ?test.test_type,
                expression = ?test.expression,
                value = %test.value,
                "Test condition"
            );
        }
        for ue_id in &item.matched_ue_ids {
            debug!(
                ran_name,
                item = item.index,
                measurement = %item.measurement,
                ue_id = %hex::encode(ue_id),
                "Matched UE"
            );
        }
    }
    for (data_index, records) in flat.records.iter().enumerate() {
        for (index, record) in records.iter().enumerate() {
            debug!(ran_name, data_index, index, record = %record, "Measurement record");
        }
    }
}
