//! Write with a single fallback index.

use serde_json::Value;

use crate::observability::metrics;
use crate::sink::{DocumentSink, SinkError};

/// Primary index plus an optional legacy alternate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexTarget<'a> {
    pub primary: &'a str,
    pub fallback: Option<&'a str>,
}

impl<'a> IndexTarget<'a> {
    pub fn new(primary: &'a str, fallback: &'a str) -> Self {
        Self {
            primary,
            fallback: Some(fallback),
        }
    }

    pub fn only(primary: &'a str) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }
}

/// Result of a write that may have used the fallback.
#[derive(Debug)]
pub enum WriteOutcome {
    /// Stored in the primary index.
    Written,
    /// Primary failed; stored in the fallback index.
    RetriedOk { index: String, primary_error: SinkError },
    /// Nothing stored. `error` is the last failure seen.
    Failed { error: SinkError },
}

impl WriteOutcome {
    pub fn is_written(&self) -> bool {
        !matches!(self, WriteOutcome::Failed { .. })
    }

    pub fn into_result(self) -> Result<(), SinkError> {
        match self {
            WriteOutcome::Written | WriteOutcome::RetriedOk { .. } => Ok(()),
            WriteOutcome::Failed { error } => Err(error),
        }
    }
}

/// Write to the primary index, then once to the fallback if one is set.
pub async fn write_with_fallback(
    sink: &dyn DocumentSink,
    target: IndexTarget<'_>,
    document: &Value,
) -> WriteOutcome {
    let primary_error = match sink.write(target.primary, document).await {
        Ok(()) => return WriteOutcome::Written,
        Err(e) => e,
    };

    let Some(fallback) = target.fallback else {
        return WriteOutcome::Failed { error: primary_error };
    };

    tracing::debug!(
        primary = target.primary,
        fallback,
        error = %primary_error,
        "Primary index write failed, trying fallback"
    );

    match sink.write(fallback, document).await {
        Ok(()) => {
            metrics::record_fallback_write(fallback);
            WriteOutcome::RetriedOk {
                index: fallback.to_string(),
                primary_error,
            }
        }
        Err(error) => {
            tracing::warn!(
                primary = target.primary,
                fallback,
                primary_error = %primary_error,
                error = %error,
                "Write failed on primary and fallback index"
            );
            WriteOutcome::Failed { error }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use serde_json::json;

    #[tokio::test]
    async fn test_primary_success() {
        let sink = MemorySink::new(10);
        let outcome = write_with_fallback(&sink, IndexTarget::new("traces", "legacy"), &json!({})).await;
        assert!(matches!(outcome, WriteOutcome::Written));
        assert_eq!(sink.documents_in("traces").len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_used_when_primary_rejects() {
        let sink = MemorySink::new(10);
        sink.reject_index("traces");
        let outcome = write_with_fallback(&sink, IndexTarget::new("traces", "legacy"), &json!({"a": 1})).await;
        match outcome {
            WriteOutcome::RetriedOk { index, primary_error } => {
                assert_eq!(index, "legacy");
                assert!(matches!(primary_error, SinkError::Rejected { .. }));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(sink.documents_in("legacy"), vec![json!({"a": 1})]);
    }

    #[tokio::test]
    async fn test_double_failure() {
        let sink = MemorySink::new(10);
        sink.reject_all(true);
        let outcome = write_with_fallback(&sink, IndexTarget::new("traces", "legacy"), &json!({})).await;
        assert!(!outcome.is_written());
        assert!(outcome.into_result().is_err());
    }

    #[tokio::test]
    async fn test_no_fallback_target() {
        let sink = MemorySink::new(10);
        sink.reject_index("logs-gaming");
        let outcome = write_with_fallback(&sink, IndexTarget::only("logs-gaming"), &json!({})).await;
        assert!(matches!(outcome, WriteOutcome::Failed { error: SinkError::Rejected { .. } }));
        assert!(sink.is_empty());
    }
}
