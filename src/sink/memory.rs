//! In-memory sink for dry runs and tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::sink::{DocumentSink, SinkError};

/// Bounded document buffer. Writes past `capacity` fail with [`SinkError::Full`].
#[derive(Debug)]
pub struct MemorySink {
    capacity: usize,
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    documents: Vec<(String, Value)>,
    rejected_indices: HashSet<String>,
    reject_all: bool,
}

impl MemorySink {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Make every write to `index` fail.
    pub fn reject_index(&self, index: impl Into<String>) {
        self.lock().rejected_indices.insert(index.into());
    }

    /// Make every write fail (or succeed again).
    pub fn reject_all(&self, reject: bool) {
        self.lock().reject_all = reject;
    }

    pub fn len(&self) -> usize {
        self.lock().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every stored (index, document) pair in write order.
    pub fn documents(&self) -> Vec<(String, Value)> {
        self.lock().documents.clone()
    }

    pub fn documents_in(&self, index: &str) -> Vec<Value> {
        self.lock()
            .documents
            .iter()
            .filter(|(i, _)| i == index)
            .map(|(_, doc)| doc.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DocumentSink for MemorySink {
    async fn write(&self, index: &str, document: &Value) -> Result<(), SinkError> {
        let mut state = self.lock();
        if state.reject_all || state.rejected_indices.contains(index) {
            return Err(SinkError::Rejected { index: index.to_string() });
        }
        if state.documents.len() >= self.capacity {
            return Err(SinkError::Full { capacity: self.capacity });
        }
        state.documents.push((index.to_string(), document.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_write_and_query() {
        let sink = MemorySink::new(10);
        sink.write("a", &json!({"n": 1})).await.unwrap();
        sink.write("b", &json!({"n": 2})).await.unwrap();
        sink.write("a", &json!({"n": 3})).await.unwrap();

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.documents_in("a"), vec![json!({"n": 1}), json!({"n": 3})]);
    }

    #[tokio::test]
    async fn test_capacity_bound() {
        let sink = MemorySink::new(1);
        sink.write("a", &json!({})).await.unwrap();
        assert!(matches!(sink.write("a", &json!({})).await, Err(SinkError::Full { capacity: 1 })));
    }

    #[tokio::test]
    async fn test_rejection_switches() {
        let sink = MemorySink::new(10);
        sink.reject_index("bad");
        assert!(sink.write("bad", &json!({})).await.is_err());
        assert!(sink.write("good", &json!({})).await.is_ok());

        sink.reject_all(true);
        assert!(sink.write("good", &json!({})).await.is_err());
        sink.reject_all(false);
        assert!(sink.write("good", &json!({})).await.is_ok());
        assert_eq!(sink.len(), 2);
    }
}
