//! Diagnosis ranking over the classifier output.
//!
//! Extracts top-1 and top-3 predictions from the probability vector, derives
//! the healthy flag from the class label, and builds the ordered detail list
//! for the report.

use serde::{Deserialize, Serialize};

use crate::classes::{class_name, display_name, is_healthy, NUM_CLASSES};
use crate::error::{Error, Result};
use crate::report::{Detail, DetailStatus};

/// Confidence above this percentage reports status "good"; at or below, "warning".
pub const CONFIDENCE_GOOD_THRESHOLD: f32 = 80.0;

/// How many ranked predictions the report carries.
pub const TOP_K: usize = 3;

/// A single ranked class prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassScore {
    /// Class index into the registry
    pub class_index: usize,
    /// Registry label
    pub class_name: String,
    /// Probability in [0, 1]
    pub probability: f32,
}

/// Ranked diagnosis for one probability vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnosis {
    /// Top-1 class index
    pub class_index: usize,
    /// Top-1 registry label
    pub class_name: String,
    /// Top-1 probability as a percentage, kept at full precision
    pub confidence: f32,
    /// Healthy/diseased flag derived from the label
    pub is_healthy: bool,
    /// Top-3 predictions, descending probability, ties broken by lowest index
    pub top: Vec<ClassScore>,
}

/// Rank a 38-length probability vector into a diagnosis.
pub fn rank(probabilities: &[f32]) -> Result<Diagnosis> {
    if probabilities.len() != NUM_CLASSES {
        return Err(Error::Inference(format!(
            "probability vector has length {}, expected {}",
            probabilities.len(),
            NUM_CLASSES
        )));
    }

    let mut indexed: Vec<(usize, f32)> = probabilities.iter().copied().enumerate().collect();
    // Descending probability; equal probabilities keep the lowest index first
    indexed.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });

    let top: Vec<ClassScore> = indexed
        .iter()
        .take(TOP_K)
        .map(|&(index, probability)| ClassScore {
            class_index: index,
            class_name: class_name(index).unwrap_or("Unknown").to_string(),
            probability,
        })
        .collect();

    let (class_index, probability) = indexed[0];
    let label = class_name(class_index).unwrap_or("Unknown").to_string();

    Ok(Diagnosis {
        class_index,
        is_healthy: is_healthy(&label),
        class_name: label,
        confidence: probability * 100.0,
        top,
    })
}

impl Diagnosis {
    /// Status classification for the confidence score: "good" strictly above
    /// the threshold, "warning" at or below it.
    pub fn confidence_status(&self) -> DetailStatus {
        if self.confidence > CONFIDENCE_GOOD_THRESHOLD {
            DetailStatus::Good
        } else {
            DetailStatus::Warning
        }
    }

    /// Confidence rounded to one decimal for report display.
    pub fn confidence_rounded(&self) -> f32 {
        (self.confidence * 10.0).round() / 10.0
    }

    /// Human-readable top-1 label.
    pub fn display_diagnosis(&self) -> String {
        display_name(&self.class_name)
    }

    /// Ordered detail list: primary diagnosis, confidence score, then the
    /// remaining top-3 predictions as alternatives.
    pub fn details(&self) -> Vec<Detail> {
        let mut details = vec![
            Detail {
                label: "Primary Diagnosis".to_string(),
                value: self.display_diagnosis(),
                status: if self.is_healthy {
                    DetailStatus::Good
                } else {
                    DetailStatus::Warning
                },
            },
            Detail {
                label: "Confidence Score".to_string(),
                value: format!("{:.1}%", self.confidence),
                status: self.confidence_status(),
            },
        ];

        // Skip the first ranked entry; it is already the primary diagnosis
        for score in self.top.iter().skip(1) {
            details.push(Detail {
                label: "Alternative Diagnosis".to_string(),
                value: format!(
                    "{} ({:.2}%)",
                    display_name(&score.class_name),
                    score.probability * 100.0
                ),
                status: DetailStatus::Info,
            });
        }

        details
    }
}
