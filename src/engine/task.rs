// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use serde_json::Value;

use crate::audit::{Audit, Marker};
use crate::errors::ExecutionError;
use crate::observability::messages::unit::{UnitExecutionCompleted, UnitExecutionFailed, UnitExecutionStarted};
use crate::observability::messages::StructuredLog;
use crate::traits::{Scheduler, Unit};

/// Callback fired with a task's completed audit.
pub type Completion = Arc<dyn Fn(&dyn Scheduler, Audit) -> Result<(), ExecutionError> + Send + Sync>;

/// One physical unit in a built workflow.
///
/// Joins register completion callbacks on their source tasks at build time;
/// a task with no callbacks hands its results to the aggregator.
pub struct Task {
    marker: Marker,
    unit: Box<dyn Unit>,
    on_complete: RwLock<Vec<Completion>>,
}

impl Task {
    pub fn new(marker: impl Into<Marker>, unit: Box<dyn Unit>) -> Self {
        Self {
            marker: marker.into(),
            unit,
            on_complete: RwLock::new(Vec::new()),
        }
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    pub fn name(&self) -> &str {
        self.unit.name()
    }

    pub fn unit(&self) -> &dyn Unit {
        self.unit.as_ref()
    }

    pub fn on_complete(&self, callback: Completion) {
        self.on_complete.write().push(callback);
    }

    pub fn callback_count(&self) -> usize {
        self.on_complete.read().len()
    }

    /// Runs the unit on the audit's current value and records the output
    /// under this task's marker.
    pub fn process(&self, mut audit: Audit) -> Result<Audit, ExecutionError> {
        let input = audit.current_value().cloned().unwrap_or(Value::Null);
        let start_msg = UnitExecutionStarted {
            unit: &self.marker,
            unit_name: self.unit.name(),
            input_kind: value_kind(&input),
        };
        let span = start_msg.span("unit_execution");
        let _guard = span.enter();
        start_msg.log();

        let started = Instant::now();
        match self.unit.process(input) {
            Ok(output) => {
                UnitExecutionCompleted {
                    unit: &self.marker,
                    duration: started.elapsed(),
                }
                .log();
                audit.record(&self.marker, output);
                Ok(audit)
            }
            Err(error) => {
                UnitExecutionFailed {
                    unit: &self.marker,
                    error: &error,
                }
                .log();
                Err(ExecutionError::UnitFailed {
                    unit: self.marker.clone(),
                    error,
                })
            }
        }
    }

    /// Hands a processed audit to every completion callback, each receiving
    /// its own fork.
    pub fn complete(&self, scheduler: &dyn Scheduler, audit: Audit) -> Result<(), ExecutionError> {
        let callbacks = self.on_complete.read().clone();
        if callbacks.is_empty() {
            scheduler.aggregator().store(audit);
            return Ok(());
        }
        for callback in callbacks {
            callback(scheduler, audit.fork())?;
        }
        Ok(())
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("marker", &self.marker)
            .field("unit", &self.unit.name())
            .field("callbacks", &self.callback_count())
            .finish()
    }
}

/// The duplication batch of one logical unit.
#[derive(Debug, Clone)]
pub struct Batch {
    tasks: Vec<Arc<Task>>,
}

impl Batch {
    pub fn new(tasks: Vec<Arc<Task>>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Arc<Task>] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The members a join acts on: the whole batch, or only the first member
    /// when `unbatched`.
    pub fn participants(&self, unbatched: bool) -> &[Arc<Task>] {
        if unbatched {
            &self.tasks[..self.tasks.len().min(1)]
        } else {
            &self.tasks
        }
    }

    pub fn markers(&self) -> Vec<&Marker> {
        self.tasks.iter().map(|task| task.marker()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{Failing, Stub};
    use crate::audit::Source;
    use serde_json::json;
    use std::io::Write;

    #[derive(Clone, Default)]
    struct Captured(Arc<parking_lot::Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture<T>(f: impl FnOnce() -> T) -> (T, String) {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, captured.text())
    }

    #[test]
    fn test_process_records_output_under_marker() {
        let task = Task::new("1:echo", Box::new(Stub::new("echo")));
        let audit = task.process(Audit::new(json!("x"), Source::Nil)).unwrap();

        assert_eq!(audit.len(), 2);
        assert_eq!(audit.current_source().and_then(Source::marker), Some(&Marker::from("1:echo")));
    }

    #[test]
    fn test_completion_is_logged_inside_execution_span() {
        let task = Task::new("1:echo", Box::new(Stub::new("echo")));
        let (result, logs) = capture(|| task.process(Audit::new(json!("x"), Source::Nil)));

        assert!(result.is_ok());
        let line = logs
            .lines()
            .find(|line| line.contains("Unit '1:echo' completed"))
            .unwrap_or_default();
        assert!(line.contains("unit_execution{"), "logs: {}", logs);
        assert!(line.contains("unit=1:echo"), "logs: {}", logs);
    }

    #[test]
    fn test_failure_is_logged_inside_execution_span() {
        let task = Task::new("0:fail", Box::new(Failing::new("fail")));
        let (result, logs) = capture(|| task.process(Audit::new(json!(1), Source::Nil)));

        assert!(matches!(result, Err(ExecutionError::UnitFailed { .. })));
        let line = logs
            .lines()
            .find(|line| line.contains("Unit '0:fail' failed"))
            .unwrap_or_default();
        assert!(line.contains("unit_execution{"), "logs: {}", logs);
    }
}
