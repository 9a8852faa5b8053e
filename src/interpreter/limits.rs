use std::time::{Duration, Instant};

use crate::prelude::*;

pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;

/// Execution limits for one run. Steps are counted per dispatched instruction and
/// per while-loop iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    pub max_steps: Option<u64>,
    pub timeout: Option<Duration>,
    pub max_call_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_steps: None, timeout: None, max_call_depth: DEFAULT_MAX_CALL_DEPTH }
    }
}

impl Limits {
    pub fn with_max_steps(self, max_steps: u64) -> Self {
        Self { max_steps: Some(max_steps), ..self }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout: Some(timeout), ..self }
    }

    pub fn with_max_call_depth(self, max_call_depth: usize) -> Self {
        Self { max_call_depth, ..self }
    }
}

/// Usage of the limits for the run in progress.
#[derive(Debug)]
pub struct Budget {
    steps: u64,
    depth: usize,
    started: Instant,
}

impl Budget {
    pub fn new() -> Self {
        Self { steps: 0, depth: 0, started: Instant::now() }
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn tick(&mut self, limits: &Limits) -> Result<(), Cancellation> {
        self.steps += 1;

        if let Some(limit) = limits.max_steps {
            if self.steps > limit {
                return Err(Cancellation::StepLimit { limit });
            }
        }

        if let Some(limit) = limits.timeout {
            if self.started.elapsed() > limit {
                return Err(Cancellation::Timeout { limit });
            }
        }

        Ok(())
    }

    pub fn enter(&mut self, limits: &Limits) -> Result<(), Cancellation> {
        if self.depth >= limits.max_call_depth {
            return Err(Cancellation::CallDepth { limit: limits.max_call_depth });
        }

        self.depth += 1;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
