//! Audit reporting for encrypt/decrypt operations.
//!
//! Records carry metadata only: never the input, the output, the tweak or key bytes.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// Algorithm name reported in every record.
pub const ALGORITHM: &str = "FF3-1";

/// Which facade operation produced a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Whole-value encryption.
    Encrypt,
    /// Whole-value decryption.
    Decrypt,
    /// PAN encryption keeping the leading and trailing digits.
    EncryptPan,
    /// PAN decryption keeping the leading and trailing digits.
    DecryptPan,
}

impl Operation {
    /// Stable lower-case label.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Encrypt => "encrypt",
            Operation::Decrypt => "decrypt",
            Operation::EncryptPan => "encrypt_pan",
            Operation::DecryptPan => "decrypt_pan",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    /// Always [`ALGORITHM`].
    pub algorithm: &'static str,
    /// Key id the caller asked for.
    pub key_id: String,
    /// Input length in characters.
    pub input_length: usize,
    /// Operation that ran.
    pub context: Operation,
    /// Whether the operation returned a value.
    pub success: bool,
    /// Error message on failure.
    pub error_detail: Option<String>,
}

/// Destination for audit records.
pub trait AuditSink {
    /// Called exactly once per facade operation.
    fn log_operation(&self, record: &AuditRecord);
}

impl<T: AuditSink + ?Sized> AuditSink for &T {
    fn log_operation(&self, record: &AuditRecord) {
        (**self).log_operation(record)
    }
}

impl<T: AuditSink + ?Sized> AuditSink for Arc<T> {
    fn log_operation(&self, record: &AuditRecord) {
        (**self).log_operation(record)
    }
}

/// Emits records as `tracing` events on the `ff3::audit` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn log_operation(&self, record: &AuditRecord) {
        if record.success {
            tracing::info!(
                target: "ff3::audit",
                algorithm = record.algorithm,
                key_id = %record.key_id,
                input_length = record.input_length,
                context = %record.context,
                success = true,
                "format-preserving operation completed"
            );
        } else {
            tracing::warn!(
                target: "ff3::audit",
                algorithm = record.algorithm,
                key_id = %record.key_id,
                input_length = record.input_length,
                context = %record.context,
                success = false,
                error = record.error_detail.as_deref().unwrap_or_default(),
                "format-preserving operation failed"
            );
        }
    }
}

/// Discards every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn log_operation(&self, _record: &AuditRecord) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_without_payload_fields() {
        let record = AuditRecord {
            algorithm: ALGORITHM,
            key_id: "pan-2024".into(),
            input_length: 16,
            context: Operation::EncryptPan,
            success: true,
            error_detail: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["algorithm"], "FF3-1");
        assert_eq!(json["context"], "encrypt_pan");
        assert_eq!(json["input_length"], 16);
        assert_eq!(json.as_object().unwrap().len(), 6);
    }

    #[test]
    fn sinks_accept_records() {
        let record = AuditRecord {
            algorithm: ALGORITHM,
            key_id: "k".into(),
            input_length: 6,
            context: Operation::Decrypt,
            success: false,
            error_detail: Some("boom".into()),
        };
        TracingAuditSink.log_operation(&record);
        NoopAuditSink.log_operation(&record);
        Arc::new(NoopAuditSink).log_operation(&record);
    }
}
