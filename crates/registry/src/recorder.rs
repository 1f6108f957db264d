//! Append-only log of every step invocation dispatched by the engine,
//! used both for replay/mocking in tests and for post-run reporting.

use parking_lot::Mutex;
use pk_core::{ExecutionId, InvocationRecord, StepArgs, StepResult};
use std::sync::atomic::{AtomicU64, Ordering};

/// Records every step dispatch in order. Cheap to clone (shares the
/// underlying log via an internal `Arc`-free `Mutex` — callers hold a
/// `Recorder` behind their own `Arc` when sharing across tasks).
#[derive(Default)]
pub struct InvocationRecorder {
    records: Mutex<Vec<InvocationRecord>>,
    next_sequence: AtomicU64,
}

impl InvocationRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new, resultless record and return its sequence number.
    pub fn begin(&self, execution_id: ExecutionId, step_name: impl Into<String>, args: StepArgs) -> u64 {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        let record = InvocationRecord::new(execution_id, step_name, args, sequence);
        self.records.lock().push(record);
        sequence
    }

    /// Attach the outcome to the record with the given sequence number.
    pub fn finish(&self, sequence: u64, result: StepResult) {
        let mut records = self.records.lock();
        if let Some(record) = records.iter_mut().find(|r| r.sequence == sequence) {
            record.result = Some(result);
        }
    }

    pub fn was_called(&self, step_name: &str) -> bool {
        self.records.lock().iter().any(|r| r.step_name == step_name)
    }

    pub fn call_count(&self, step_name: &str) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|r| r.step_name == step_name)
            .count()
    }

    /// Records for the given step name whose invocation also satisfies
    /// `predicate`, in invocation order.
    pub fn calls_matching(
        &self,
        step_name: &str,
        predicate: impl Fn(&InvocationRecord) -> bool,
    ) -> Vec<InvocationRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.step_name == step_name && predicate(r))
            .cloned()
            .collect()
    }

    /// The dispatch names in the order they were invoked.
    pub fn execution_order(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.step_name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

#[cfg(test)]
#[path = "recorder_tests.rs"]
mod tests;
