//! # agrivision
//!
//! Plant disease inference pipeline for an agriculture vision service.
//!
//! Takes a caller-supplied image in any of the supported encodings, normalizes
//! it into the classifier's input tensor, runs a ResNet-18 with a 38-way
//! classification head, and shapes the probabilities into a structured
//! diagnostic report with rule-based recommendations.
//!
//! ## Modules
//!
//! - `decode`: multi-format image decoding into canonical RGB
//! - `preprocess`: resize and ImageNet normalization into the input tensor
//! - `model`: ResNet-18 topology built with Burn
//! - `classifier`: model loading, device placement, and the forward pass
//! - `ranking`: top-k extraction and the healthy/diseased policy
//! - `recommend`: rule table mapping diagnoses to advisory text
//! - `analyzer`: the analysis facade dispatching the four modes
//! - `report`: the JSON report value objects
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use agrivision::{AgricultureAnalyzer, AnalyzerConfig, ImageInput};
//!
//! let analyzer = AgricultureAnalyzer::new(&AnalyzerConfig::default());
//! let report = analyzer.analyze(ImageInput::Bytes(bytes), Some("plant-disease"))?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

pub mod analyzer;
pub mod backend;
pub mod classes;
pub mod classifier;
pub mod decode;
pub mod error;
pub mod model;
pub mod preprocess;
pub mod ranking;
pub mod recommend;
pub mod report;

// Re-export commonly used items for convenience
pub use analyzer::{AgricultureAnalyzer, AnalysisMode, AnalyzerConfig};
pub use classes::{class_name, CLASS_NAMES, NUM_CLASSES};
pub use classifier::{Classifier, ClassifierConfig};
pub use decode::ImageInput;
pub use error::{Error, Result};
pub use ranking::{ClassScore, Diagnosis};
pub use report::{Detail, DetailStatus, DiagnosticReport, ReportStatus};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
