//! In-memory metric sink
//!
//! Keeps every written point. Used when no database is configured and by
//! tests; `fail_writes` makes every write fail.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::MetricPoint;
use crate::error::SinkError;
use crate::ports::MetricSink;

#[derive(Default)]
pub struct InMemorySink {
    points: Mutex<Vec<MetricPoint>>,
    fail_writes: AtomicBool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn points(&self) -> Vec<MetricPoint> {
        self.points.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.points.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.points.lock().clear();
    }
}

#[async_trait]
impl MetricSink for InMemorySink {
    async fn write(&self, point: &MetricPoint) -> Result<(), SinkError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SinkError::Unreachable("in-memory sink set to fail".into()));
        }
        self.points.lock().push(point.clone());
        Ok(())
    }
}
