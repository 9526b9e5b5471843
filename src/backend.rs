//! Backend selection for the Burn framework.
//!
//! The default build runs on the CPU NdArray backend so the service works
//! anywhere; the `cuda` feature moves every forward pass to the GPU. The
//! device is fixed at compile time and chosen once at classifier construction.

use burn::tensor::backend::Backend;

#[cfg(feature = "cuda")]
pub type InferenceBackend = burn_cuda::Cuda;

#[cfg(not(feature = "cuda"))]
pub type InferenceBackend = burn::backend::NdArray;

/// Device type of the selected backend.
pub type InferenceDevice = <InferenceBackend as Backend>::Device;

/// Get the default device for the selected backend.
pub fn default_device() -> InferenceDevice {
    InferenceDevice::default()
}

/// Get a human-readable name for the compiled backend.
pub fn backend_name() -> &'static str {
    #[cfg(feature = "cuda")]
    {
        "CUDA (GPU)"
    }
    #[cfg(not(feature = "cuda"))]
    {
        "NdArray (CPU)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_name() {
        assert!(!backend_name().is_empty());
    }

    #[test]
    fn test_default_device() {
        // Just ensure device construction does not panic
        let _ = default_device();
    }
}
