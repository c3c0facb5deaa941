// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::Value;

use crate::errors::UnitError;
use crate::traits::Unit;

/// A unit that passes its input through unchanged.
pub struct Stub {
    pub name: String,
}

impl Stub {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Unit for Stub {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, input: Value) -> Result<Value, UnitError> {
        Ok(input)
    }
}

/// A unit that always fails, for failure-propagation tests.
pub struct Failing {
    pub name: String,
}

impl Failing {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Unit for Failing {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, _input: Value) -> Result<Value, UnitError> {
        Err(UnitError::failed("Simulated unit failure"))
    }
}

/// A pass-through unit that counts its invocations.
pub struct Counting {
    pub name: String,
    calls: Arc<AtomicUsize>,
}

impl Counting {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared handle on the invocation counter.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Unit for Counting {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, input: Value) -> Result<Value, UnitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(input)
    }
}
