use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{DashboardError, ProviderId, Severity, ValidationError};

pub const SCHEMA_VERSION: &str = "v1.0.0";

/// Standard response envelope for `tickboard --format json` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EnvelopeError>,
}

impl<T> Envelope<T> {
    pub fn with_errors(
        meta: EnvelopeMeta,
        data: T,
        errors: Vec<EnvelopeError>,
    ) -> Result<Self, ValidationError> {
        meta.validate()?;
        for error in &errors {
            error.validate()?;
        }

        Ok(Self { meta, data, errors })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    pub schema_version: String,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    pub source_chain: Vec<ProviderId>,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    pub fn new(
        request_id: impl Into<String>,
        source_chain: Vec<ProviderId>,
        latency_ms: u64,
    ) -> Result<Self, ValidationError> {
        let meta = Self {
            request_id: request_id.into(),
            schema_version: String::from(SCHEMA_VERSION),
            generated_at: OffsetDateTime::now_utc(),
            source_chain,
            latency_ms,
            warnings: Vec::new(),
        };
        meta.validate()?;
        Ok(meta)
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.request_id.trim().len() < 8 {
            return Err(ValidationError::InvalidRequestId);
        }

        if !is_valid_schema_version(&self.schema_version) {
            return Err(ValidationError::InvalidSchemaVersion {
                value: self.schema_version.clone(),
            });
        }

        if self.source_chain.is_empty() {
            return Err(ValidationError::EmptySourceChain);
        }

        Ok(())
    }
}

/// Structured error payload for failed or partial responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl EnvelopeError {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code.trim().is_empty() {
            return Err(ValidationError::EmptyErrorCode);
        }

        if self.message.trim().is_empty() {
            return Err(ValidationError::EmptyErrorMessage);
        }

        Ok(())
    }
}

impl From<&DashboardError> for EnvelopeError {
    fn from(error: &DashboardError) -> Self {
        Self {
            code: error.code().to_owned(),
            message: error.to_string(),
            severity: Some(error.severity()),
        }
    }
}

fn is_valid_schema_version(value: &str) -> bool {
    let Some(version) = value.strip_prefix('v') else {
        return false;
    };

    let mut parts = version.split('.');
    let major = parts.next();
    let minor = parts.next();
    let patch = parts.next();

    if parts.next().is_some() {
        return false;
    }

    [major, minor, patch].iter().all(|part| {
        part.is_some_and(|segment| {
            !segment.is_empty() && segment.chars().all(|ch| ch.is_ascii_digit())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_meta() {
        let meta = EnvelopeMeta::new("request-12345", vec![ProviderId::Yahoo], 11)
            .expect("meta should be valid");

        assert_eq!(meta.schema_version, "v1.0.0");
    }

    #[test]
    fn rejects_short_request_id() {
        let err = EnvelopeMeta::new("abc", vec![ProviderId::Yahoo], 1).expect_err("must fail");
        assert_eq!(err, ValidationError::InvalidRequestId);
    }

    #[test]
    fn rejects_bad_schema_version() {
        let mut meta = EnvelopeMeta::new("request-12345", vec![ProviderId::Synthetic], 1)
            .expect("meta must be valid");
        meta.schema_version = String::from("1.0.0");
        let err = meta.validate().expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidSchemaVersion { .. }));
    }

    #[test]
    fn envelope_rejects_error_without_code() {
        let meta = EnvelopeMeta::new("request-12345", vec![ProviderId::Yahoo], 1)
            .expect("meta must be valid");
        let blank = EnvelopeError {
            code: String::from(" "),
            message: String::from("message"),
            severity: None,
        };
        let err = Envelope::with_errors(meta, (), vec![blank]).expect_err("must fail");
        assert_eq!(err, ValidationError::EmptyErrorCode);
    }

    #[test]
    fn dashboard_errors_carry_code_and_severity() {
        let error = EnvelopeError::from(&DashboardError::EmptySelection);
        assert_eq!(error.code, "dashboard.empty_selection");
        assert_eq!(error.severity, Some(Severity::Warning));
    }

    #[test]
    fn serializes_generated_at_as_rfc3339() {
        let meta = EnvelopeMeta::new("request-12345", vec![ProviderId::Yahoo], 3)
            .expect("meta must be valid");
        let envelope = Envelope::with_errors(meta, 1, Vec::new()).expect("valid envelope");
        let json = serde_json::to_value(envelope).expect("serializes");
        let generated_at = json["meta"]["generated_at"].as_str().expect("string");
        assert!(generated_at.contains('T'));
        assert_eq!(json["meta"]["source_chain"][0], "yahoo");
        assert!(json.get("errors").is_none());
    }
}
