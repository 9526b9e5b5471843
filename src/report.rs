//! Diagnostic report value objects.
//!
//! The per-request output: a serde-serializable structure matching the JSON
//! contract of the external HTTP layer. Reports are returned to the caller
//! and never persisted.

use serde::{Deserialize, Serialize};

/// Overall report status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    #[serde(rename = "Healthy")]
    Healthy,
    #[serde(rename = "Disease Detected")]
    DiseaseDetected,
    #[serde(rename = "Analysis Complete")]
    AnalysisComplete,
    #[serde(rename = "Error")]
    Error,
}

/// Status tag for a single detail entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailStatus {
    Good,
    Warning,
    Info,
    Error,
}

/// One labelled finding in a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detail {
    pub label: String,
    pub value: String,
    pub status: DetailStatus,
}

/// Structured analysis report returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub status: ReportStatus,

    /// Confidence percentage, one decimal (absent for the shaped modes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,

    /// Human-readable primary diagnosis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,

    pub details: Vec<Detail>,

    pub recommendations: Vec<String>,

    /// Error message, present only on Error-status reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DiagnosticReport {
    /// Fixed fallback report for a failed pipeline run.
    ///
    /// The details and recommendations are a fixed set so callers always get a
    /// well-formed report, even on failure.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ReportStatus::Error,
            confidence: None,
            diagnosis: None,
            details: vec![Detail {
                label: "Error".to_string(),
                value: "Failed to analyze image. Please try again.".to_string(),
                status: DetailStatus::Error,
            }],
            recommendations: vec![
                "Please ensure the image is clear and well-lit".to_string(),
                "Try uploading a different image".to_string(),
                "Make sure the image shows the plant leaves clearly".to_string(),
            ],
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&ReportStatus::DiseaseDetected).unwrap(),
            "\"Disease Detected\""
        );
        assert_eq!(
            serde_json::to_string(&ReportStatus::AnalysisComplete).unwrap(),
            "\"Analysis Complete\""
        );
        assert_eq!(serde_json::to_string(&ReportStatus::Healthy).unwrap(), "\"Healthy\"");
        assert_eq!(
            serde_json::to_string(&DetailStatus::Warning).unwrap(),
            "\"warning\""
        );
    }

    #[test]
    fn test_report_json_shape() {
        let report = DiagnosticReport {
            status: ReportStatus::Healthy,
            confidence: Some(92.5),
            diagnosis: Some("Apple - healthy".to_string()),
            details: vec![Detail {
                label: "Primary Diagnosis".to_string(),
                value: "Apple - healthy".to_string(),
                status: DetailStatus::Good,
            }],
            recommendations: vec!["Continue current maintenance practices".to_string()],
            error: None,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "Healthy");
        assert_eq!(json["confidence"], 92.5);
        assert_eq!(json["details"][0]["status"], "good");
        // Absent optional fields are omitted, not null
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_error_report_shape() {
        let report = DiagnosticReport::error("Image decode error: truncated header");

        assert_eq!(report.status, ReportStatus::Error);
        assert!(report.confidence.is_none());
        assert!(report.diagnosis.is_none());
        assert_eq!(report.details.len(), 1);
        assert_eq!(report.details[0].label, "Error");
        assert_eq!(report.details[0].status, DetailStatus::Error);
        assert_eq!(report.recommendations.len(), 3);
        assert!(report.error.unwrap().contains("decode"));
    }
}
