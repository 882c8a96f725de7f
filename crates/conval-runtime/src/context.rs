//! Resolution context
//!
//! The context supplies everything a provider reads at evaluation time: the
//! runtime data graph and a clock. Providers only borrow it, so one context
//! can be shared by every node of a tree during a single evaluation.

use chrono::{DateTime, Utc};
use conval_core::Value;
use std::fmt;
use std::sync::Arc;

/// Source of the current instant
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Read-only context for one evaluation
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// Runtime data graph ("automation data")
    data: Value,
    clock: Arc<dyn Clock>,
}

impl ResolveContext {
    /// Create a context over a data graph using the system clock
    pub fn new(data: Value) -> Self {
        Self {
            data,
            clock: Arc::new(SystemClock),
        }
    }

    /// Create a context from JSON data
    pub fn from_json(data: serde_json::Value) -> Self {
        Self::new(Value::from(data))
    }

    /// Builder method to replace the clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::new(Value::Null)
    }
}
