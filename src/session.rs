//! Caller-owned cache of the last pipeline outcome.
//!
//! A cached outcome is reused only while every input that produced it is
//! unchanged: the record file, the boundary file, the selected columns, and the
//! field delimiter.

use std::sync::Arc;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::Outcome;
use crate::source::Delimiter;

/// Everything a cached outcome depends on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub records_digest: u64,
    pub boundary_digest: u64,
    pub x_field: String,
    pub y_field: String,
    pub delimiter: Delimiter,
}

#[derive(Debug, Default)]
pub struct AnalysisSession {
    cached: Option<(SessionKey, Arc<Outcome>)>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached outcome for `key`, or run `compute` and cache its result.
    ///
    /// A differing key drops the previous outcome before computing. Errors are
    /// not cached.
    pub fn get_or_run<F>(&mut self, key: SessionKey, compute: F) -> Result<Arc<Outcome>>
    where
        F: FnOnce() -> Result<Outcome>,
    {
        if let Some((cached_key, outcome)) = &self.cached {
            if *cached_key == key {
                debug!("Session cache hit");
                return Ok(Arc::clone(outcome));
            }
            info!("Session inputs changed, discarding cached outcome");
        }

        self.cached = None;
        let outcome = Arc::new(compute()?);
        self.cached = Some((key, Arc::clone(&outcome)));
        Ok(outcome)
    }

    /// The cached outcome, if it was produced for `key`
    pub fn current(&self, key: &SessionKey) -> Option<Arc<Outcome>> {
        self.cached
            .as_ref()
            .filter(|(cached_key, _)| cached_key == key)
            .map(|(_, outcome)| Arc::clone(outcome))
    }

    pub fn invalidate(&mut self) {
        if self.cached.take().is_some() {
            info!("Session cache invalidated");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cached.is_none()
    }
}
