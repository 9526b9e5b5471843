//! Classifier adapter owning the loaded model and its device.
//!
//! The adapter is constructed once at service startup and shared read-only
//! across requests; no per-request model reload, no weight mutation. `infer`
//! is the single operation: normalized input tensor in, 38-way probability
//! distribution out.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use burn::module::Module;
use burn::record::CompactRecorder;
use burn::tensor::Tensor;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::backend::{backend_name, default_device, InferenceBackend, InferenceDevice};
use crate::classes::NUM_CLASSES;
use crate::error::{Error, Result};
use crate::model::{PlantDiseaseNet, PlantDiseaseNetConfig};
use crate::preprocess::IMAGE_SIZE;

/// Default weights location, relative to the service working directory.
/// The recorder appends its own `.mpk` extension.
pub const DEFAULT_WEIGHTS_PATH: &str = "models/plant_disease_model";

/// Classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Path to the weights file (recorder format, extension added by the recorder)
    pub weights_path: PathBuf,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            weights_path: PathBuf::from(DEFAULT_WEIGHTS_PATH),
        }
    }
}

/// The loaded classifier: frozen network plus the device it runs on.
pub struct Classifier {
    // The mutex serializes forward passes on the device; decode/preprocess
    // (which run before the lock is taken) stay parallel. It also provides the
    // `Sync` the `Arc`-shared state needs, since the Burn module is `!Sync`.
    model: Mutex<PlantDiseaseNet<InferenceBackend>>,
    device: InferenceDevice,
    degraded: bool,
}

impl Classifier {
    /// Load the classifier at service startup.
    ///
    /// A missing or unreadable weights file does not fail startup: the service
    /// falls back to a freshly initialized model whose predictions are
    /// well-formed but meaningless. The fallback is logged at warn level and
    /// exposed through [`Classifier::is_degraded`].
    pub fn load(config: &ClassifierConfig) -> Self {
        let device = default_device();
        let net_config = PlantDiseaseNetConfig::new();

        let (model, degraded) =
            match Self::load_weights(&net_config, &config.weights_path, &device) {
                Ok(model) => {
                    info!("Model weights loaded from {:?}", config.weights_path);
                    (model, false)
                }
                Err(err) => {
                    warn!("{}", err);
                    (PlantDiseaseNet::new(&net_config, &device), true)
                }
            };

        info!(
            "Classifier ready on {} ({} classes)",
            backend_name(),
            NUM_CLASSES
        );

        Self {
            model: Mutex::new(model),
            device,
            degraded,
        }
    }

    fn load_weights(
        net_config: &PlantDiseaseNetConfig,
        path: &Path,
        device: &InferenceDevice,
    ) -> Result<PlantDiseaseNet<InferenceBackend>> {
        let model = PlantDiseaseNet::new(net_config, device);
        model
            .load_file(path.to_path_buf(), &CompactRecorder::new(), device)
            .map_err(|e| {
                Error::ModelLoadDegraded(format!("failed to load weights from {path:?}: {e:?}"))
            })
    }

    /// Whether the classifier is serving the untrained fallback model
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Device the classifier was constructed on
    pub fn device(&self) -> &InferenceDevice {
        &self.device
    }

    /// Run a forward pass and return the 38-way probability distribution.
    ///
    /// The tensor is moved to the classifier's device first. Softmax is
    /// applied over the logits, so the result is non-negative and sums to 1
    /// within floating-point tolerance. Failures are not retried.
    pub fn infer(&self, tensor: Tensor<InferenceBackend, 4>) -> Result<Vec<f32>> {
        let size = IMAGE_SIZE as usize;
        let dims = tensor.dims();
        if dims != [1, 3, size, size] {
            return Err(Error::Inference(format!(
                "input tensor has shape {dims:?}, expected [1, 3, {size}, {size}]"
            )));
        }

        let tensor = tensor.to_device(&self.device);

        let output = {
            let model = self
                .model
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            model.forward_softmax(tensor)
        };

        let probabilities: Vec<f32> = output
            .into_data()
            .to_vec()
            .map_err(|e| Error::Inference(format!("failed to extract probabilities: {e:?}")))?;

        if probabilities.len() != NUM_CLASSES {
            return Err(Error::Inference(format!(
                "model returned {} scores, expected {}",
                probabilities.len(),
                NUM_CLASSES
            )));
        }

        Ok(probabilities)
    }
}
