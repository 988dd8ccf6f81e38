//! Structured operation trace.
//!
//! An optional side-channel that reports which operations a pipeline would
//! perform and the fully resolved parameters (defaults filled in). The
//! numeric functions never construct or consult traces; callers who want a
//! human-readable account of a pipeline collect records themselves from the
//! configs' `record()` methods.

use serde::{Deserialize, Serialize};

/// One performed operation with its resolved parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    /// Operation name, e.g. `"stft"` or `"mel_filter_bank"`.
    pub operation: String,
    /// Resolved parameter values as a JSON object.
    pub params: serde_json::Value,
}

impl OperationRecord {
    /// Creates a record.
    pub fn new(operation: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            operation: operation.into(),
            params,
        }
    }
}

/// Ordered collection of operation records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    records: Vec<OperationRecord>,
}

impl Trace {
    /// Creates an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub fn push(&mut self, record: OperationRecord) {
        self.records.push(record);
    }

    /// Borrows the collected records in insertion order.
    pub fn records(&self) -> &[OperationRecord] {
        &self.records
    }

    /// Serializes the trace to pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.records).unwrap_or_else(|_| "[]".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_trace_collects_in_order() {
        let mut trace = Trace::new();
        trace.push(OperationRecord::new("stft", json!({ "fft_length": 512 })));
        trace.push(OperationRecord::new("mel_filter_bank", json!({ "num_bands": 50 })));

        assert_eq!(trace.records().len(), 2);
        assert_eq!(trace.records()[0].operation, "stft");
        assert_eq!(trace.records()[1].operation, "mel_filter_bank");
    }

    #[test]
    fn test_trace_json_round_trips() {
        let mut trace = Trace::new();
        trace.push(OperationRecord::new("mfcc", json!({ "num_coeffs": 20 })));

        let parsed: Vec<OperationRecord> = serde_json::from_str(&trace.to_json()).unwrap();
        assert_eq!(parsed, trace.records());
    }
}
