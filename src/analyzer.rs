//! Analysis facade: the single entry point for the HTTP layer.
//!
//! Dispatches one of four analysis modes. Every mode funnels through the same
//! decode -> preprocess -> classify -> rank pipeline and differs only in how
//! the diagnosis is shaped into a report; irrigation returns fixed stub
//! fields. Pipeline failures are converted into an Error-status report at
//! this boundary; only an unsupported mode string is returned as an error.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classifier::{Classifier, ClassifierConfig};
use crate::decode::{decode, ImageInput};
use crate::error::{Error, Result};
use crate::preprocess::preprocess;
use crate::ranking::{rank, Diagnosis};
use crate::recommend::recommendations_for;
use crate::report::{Detail, DetailStatus, DiagnosticReport, ReportStatus};

/// Analysis modes exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisMode {
    #[default]
    PlantDisease,
    CropHealth,
    WeedDetection,
    Irrigation,
}

impl AnalysisMode {
    /// Wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::PlantDisease => "plant-disease",
            AnalysisMode::CropHealth => "crop-health",
            AnalysisMode::WeedDetection => "weed-detection",
            AnalysisMode::Irrigation => "irrigation",
        }
    }
}

impl FromStr for AnalysisMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "plant-disease" => Ok(AnalysisMode::PlantDisease),
            "crop-health" => Ok(AnalysisMode::CropHealth),
            "weed-detection" => Ok(AnalysisMode::WeedDetection),
            "irrigation" => Ok(AnalysisMode::Irrigation),
            other => Err(Error::UnsupportedMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analyzer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Classifier settings (weights location)
    pub classifier: ClassifierConfig,
}

/// Agriculture vision analyzer: owns the classifier and serves all modes.
///
/// Constructed once at process startup and shared read-only across requests;
/// handlers receive it by reference.
pub struct AgricultureAnalyzer {
    classifier: Classifier,
}

impl AgricultureAnalyzer {
    /// Construct the analyzer, loading the model once.
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            classifier: Classifier::load(&config.classifier),
        }
    }

    /// Whether the underlying model is the untrained fallback.
    pub fn is_degraded(&self) -> bool {
        self.classifier.is_degraded()
    }

    /// Analyze an image, selecting the mode by its wire name.
    ///
    /// `None` selects the default plant-disease mode. An unknown mode string
    /// is the only error this returns; pipeline failures come back as an
    /// Error-status report.
    pub fn analyze(&self, image: ImageInput, mode: Option<&str>) -> Result<DiagnosticReport> {
        let mode = match mode {
            Some(name) => name.parse()?,
            None => AnalysisMode::default(),
        };
        Ok(self.analyze_mode(image, mode))
    }

    /// Analyze an image in a specific mode.
    ///
    /// Never fails: any pipeline error is converted into the fixed
    /// Error-status report.
    pub fn analyze_mode(&self, image: ImageInput, mode: AnalysisMode) -> DiagnosticReport {
        let diagnosis = match self.diagnose(image) {
            Ok(diagnosis) => diagnosis,
            Err(err) => {
                warn!("Analysis failed ({mode}): {err}");
                return DiagnosticReport::error(err.to_string());
            }
        };

        match mode {
            AnalysisMode::PlantDisease => disease_report(&diagnosis),
            AnalysisMode::CropHealth => crop_health_report(&diagnosis),
            AnalysisMode::WeedDetection => weed_report(&diagnosis),
            AnalysisMode::Irrigation => irrigation_report(),
        }
    }

    /// Run the shared pipeline: decode, preprocess, classify, rank.
    fn diagnose(&self, image: ImageInput) -> Result<Diagnosis> {
        let rgb = decode(image)?;
        let tensor = preprocess(&rgb, self.classifier.device())?;
        let probabilities = self.classifier.infer(tensor)?;
        let diagnosis = rank(&probabilities)?;

        debug!(
            "Diagnosis: {} ({:.1}%)",
            diagnosis.class_name, diagnosis.confidence
        );

        Ok(diagnosis)
    }
}

/// Full plant-disease report.
fn disease_report(diagnosis: &Diagnosis) -> DiagnosticReport {
    DiagnosticReport {
        status: if diagnosis.is_healthy {
            ReportStatus::Healthy
        } else {
            ReportStatus::DiseaseDetected
        },
        confidence: Some(diagnosis.confidence_rounded()),
        diagnosis: Some(diagnosis.display_diagnosis()),
        details: diagnosis.details(),
        recommendations: recommendations_for(&diagnosis.class_name, diagnosis.confidence),
        error: None,
    }
}

/// Crop-health mode: the disease result without the diagnosis field.
fn crop_health_report(diagnosis: &Diagnosis) -> DiagnosticReport {
    DiagnosticReport {
        diagnosis: None,
        ..disease_report(diagnosis)
    }
}

/// Weed-detection mode: disease details with a fixed recommendation list.
fn weed_report(diagnosis: &Diagnosis) -> DiagnosticReport {
    DiagnosticReport {
        status: ReportStatus::AnalysisComplete,
        confidence: None,
        diagnosis: None,
        details: diagnosis.details(),
        recommendations: vec![
            "Regular monitoring for weed growth".to_string(),
            "Consider mechanical weed control methods".to_string(),
            "Apply targeted herbicide if necessary".to_string(),
        ],
        error: None,
    }
}

/// Irrigation mode: fixed stub fields; the diagnosis is discarded entirely.
fn irrigation_report() -> DiagnosticReport {
    DiagnosticReport {
        status: ReportStatus::AnalysisComplete,
        confidence: None,
        diagnosis: None,
        details: vec![
            Detail {
                label: "Moisture Level".to_string(),
                value: "Optimal".to_string(),
                status: DetailStatus::Good,
            },
            Detail {
                label: "Stress Indicators".to_string(),
                value: "None".to_string(),
                status: DetailStatus::Good,
            },
        ],
        recommendations: vec![
            "Continue current irrigation schedule".to_string(),
            "Maintain fertilization regime".to_string(),
            "Monitor for seasonal pests".to_string(),
        ],
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::NUM_CLASSES;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn test_analyzer() -> (AgricultureAnalyzer, TempDir) {
        let dir = TempDir::new().unwrap();
        let config = AnalyzerConfig {
            classifier: ClassifierConfig {
                weights_path: dir.path().join("missing_model"),
            },
        };
        (AgricultureAnalyzer::new(&config), dir)
    }

    fn leaf_png_bytes() -> Vec<u8> {
        let img = RgbImage::from_pixel(500, 500, Rgb([40, 160, 60]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn healthy_diagnosis() -> Diagnosis {
        // Index 3 is Apple___healthy
        let mut probs = vec![0.0f32; NUM_CLASSES];
        probs[3] = 0.9;
        probs[0] = 0.07;
        probs[1] = 0.03;
        rank(&probs).unwrap()
    }

    fn diseased_diagnosis() -> Diagnosis {
        // Index 21 is Potato___Late_blight
        let mut probs = vec![0.0f32; NUM_CLASSES];
        probs[21] = 0.85;
        probs[20] = 0.1;
        probs[22] = 0.05;
        rank(&probs).unwrap()
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(
            "plant-disease".parse::<AnalysisMode>().unwrap(),
            AnalysisMode::PlantDisease
        );
        assert_eq!(
            "irrigation".parse::<AnalysisMode>().unwrap(),
            AnalysisMode::Irrigation
        );
        assert_eq!(AnalysisMode::default(), AnalysisMode::PlantDisease);

        let err = "foo".parse::<AnalysisMode>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedMode(_)));
    }

    #[test]
    fn test_disease_report_healthy() {
        let report = disease_report(&healthy_diagnosis());

        assert_eq!(report.status, ReportStatus::Healthy);
        assert_eq!(report.confidence, Some(90.0));
        assert_eq!(report.diagnosis.as_deref(), Some("Apple - healthy"));
        assert!(report.details.len() >= 2);
        assert_eq!(
            report.recommendations,
            vec![
                "Continue current maintenance practices",
                "Regular monitoring for early disease detection",
                "Maintain proper irrigation and fertilization schedule",
            ]
        );
    }

    #[test]
    fn test_disease_report_diseased() {
        let report = disease_report(&diseased_diagnosis());

        assert_eq!(report.status, ReportStatus::DiseaseDetected);
        assert_eq!(report.diagnosis.as_deref(), Some("Potato - Late_blight"));
        assert_eq!(report.recommendations.len(), 3);
        // "blight" keyword tip is the final recommendation
        assert_eq!(
            report.recommendations[2],
            "Ensure proper plant spacing for better airflow"
        );
    }

    #[test]
    fn test_crop_health_report_drops_diagnosis() {
        let report = crop_health_report(&diseased_diagnosis());

        assert_eq!(report.status, ReportStatus::DiseaseDetected);
        assert!(report.diagnosis.is_none());
        assert!(report.confidence.is_some());
    }

    #[test]
    fn test_weed_report_shape() {
        let report = weed_report(&diseased_diagnosis());

        assert_eq!(report.status, ReportStatus::AnalysisComplete);
        assert!(report.confidence.is_none());
        assert_eq!(report.recommendations[0], "Regular monitoring for weed growth");
        assert_eq!(report.recommendations.len(), 3);
        assert!(!report.details.is_empty());
    }

    #[test]
    fn test_irrigation_report_is_fixed() {
        let report = irrigation_report();

        assert_eq!(report.status, ReportStatus::AnalysisComplete);
        assert_eq!(report.details.len(), 2);
        assert_eq!(report.details[0].label, "Moisture Level");
        assert_eq!(report.details[0].value, "Optimal");
        assert_eq!(report.details[1].label, "Stress Indicators");
        assert_eq!(report.recommendations.len(), 3);
    }

    #[test]
    fn test_analyze_rejects_unknown_mode() {
        let (analyzer, _dir) = test_analyzer();
        let result = analyzer.analyze(ImageInput::Bytes(leaf_png_bytes()), Some("foo"));
        assert!(matches!(result, Err(Error::UnsupportedMode(_))));
    }

    #[test]
    fn test_analyze_valid_image_returns_well_formed_report() {
        let (analyzer, _dir) = test_analyzer();
        let report = analyzer
            .analyze(ImageInput::Bytes(leaf_png_bytes()), None)
            .unwrap();

        // The fallback model is untrained, so the specific class is
        // meaningless; the report shape is still guaranteed
        assert!(matches!(
            report.status,
            ReportStatus::Healthy | ReportStatus::DiseaseDetected
        ));
        assert!(report.confidence.unwrap() > 0.0);
        assert!(report.diagnosis.is_some());
        assert!(report.details.len() >= 2);
        assert_eq!(report.recommendations.len(), 3);
        assert!(report.error.is_none());
    }

    #[test]
    fn test_analyze_corrupt_bytes_returns_error_report() {
        let (analyzer, _dir) = test_analyzer();
        let report = analyzer
            .analyze(ImageInput::Bytes(vec![0xFF, 0xD8, 0xFF]), Some("plant-disease"))
            .unwrap();

        assert_eq!(report.status, ReportStatus::Error);
        assert!(report.error.is_some());
        assert_eq!(report.recommendations.len(), 3);
        assert_eq!(report.details[0].label, "Error");
    }

    #[test]
    fn test_pipeline_error_report_shape_is_mode_independent() {
        let (analyzer, _dir) = test_analyzer();
        let report =
            analyzer.analyze_mode(ImageInput::Bytes(vec![0x00]), AnalysisMode::Irrigation);

        assert_eq!(report.status, ReportStatus::Error);
        assert_eq!(report.recommendations.len(), 3);
    }
}
