//! Model module for the classifier network
//!
//! This module provides:
//! - The ResNet-18 topology with a 38-way classification head
//! - Network configuration
//!
//! Weight loading and device placement live in the classifier adapter.

pub mod resnet;

// Re-export main types for convenience
pub use resnet::{BasicBlock, PlantDiseaseNet, PlantDiseaseNetConfig};
