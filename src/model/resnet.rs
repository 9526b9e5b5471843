//! ResNet-18 classifier topology for plant disease classification.
//!
//! The network is treated as a fixed artifact: a standard ResNet-18 backbone
//! with the final layer replaced by a 38-way classification head. There is no
//! dropout anywhere in the topology, so inference is deterministic given
//! identical input and weights.

use burn::{
    config::Config,
    module::Module,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig, MaxPool2d, MaxPool2dConfig},
        BatchNorm, BatchNormConfig, Linear, LinearConfig, PaddingConfig2d, Relu,
    },
    tensor::{backend::Backend, Tensor},
};

/// Configuration for the plant disease classifier network
#[derive(Config, Debug)]
pub struct PlantDiseaseNetConfig {
    /// Number of output classes (38 for PlantVillage)
    #[config(default = "38")]
    pub num_classes: usize,

    /// Number of input channels (3 for RGB)
    #[config(default = "3")]
    pub in_channels: usize,
}

/// 1x1 projection shortcut used when a stage changes resolution or width
#[derive(Module, Debug)]
pub struct Downsample<B: Backend> {
    conv: Conv2d<B>,
    bn: BatchNorm<B, 2>,
}

impl<B: Backend> Downsample<B> {
    fn new(in_channels: usize, out_channels: usize, stride: usize, device: &B::Device) -> Self {
        let conv = Conv2dConfig::new([in_channels, out_channels], [1, 1])
            .with_stride([stride, stride])
            .with_bias(false)
            .init(device);
        let bn = BatchNormConfig::new(out_channels).init(device);

        Self { conv, bn }
    }

    fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        self.bn.forward(self.conv.forward(x))
    }
}

/// A residual basic block: two 3x3 convolutions with a shortcut connection
#[derive(Module, Debug)]
pub struct BasicBlock<B: Backend> {
    conv1: Conv2d<B>,
    bn1: BatchNorm<B, 2>,
    conv2: Conv2d<B>,
    bn2: BatchNorm<B, 2>,
    downsample: Option<Downsample<B>>,
    relu: Relu,
}

impl<B: Backend> BasicBlock<B> {
    /// Create a new basic block
    pub fn new(in_channels: usize, out_channels: usize, stride: usize, device: &B::Device) -> Self {
        let conv1 = Conv2dConfig::new([in_channels, out_channels], [3, 3])
            .with_stride([stride, stride])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .with_bias(false)
            .init(device);
        let bn1 = BatchNormConfig::new(out_channels).init(device);

        let conv2 = Conv2dConfig::new([out_channels, out_channels], [3, 3])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .with_bias(false)
            .init(device);
        let bn2 = BatchNormConfig::new(out_channels).init(device);

        // Project the shortcut whenever the block changes shape
        let downsample = if stride != 1 || in_channels != out_channels {
            Some(Downsample::new(in_channels, out_channels, stride, device))
        } else {
            None
        };

        Self {
            conv1,
            bn1,
            conv2,
            bn2,
            downsample,
            relu: Relu::new(),
        }
    }

    /// Forward pass through the block
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let identity = match &self.downsample {
            Some(downsample) => downsample.forward(x.clone()),
            None => x.clone(),
        };

        let out = self.conv1.forward(x);
        let out = self.bn1.forward(out);
        let out = self.relu.forward(out);
        let out = self.conv2.forward(out);
        let out = self.bn2.forward(out);

        self.relu.forward(out + identity)
    }
}

/// Plant Disease Classifier
///
/// Architecture:
/// - 7x7/2 stem convolution with BatchNorm and ReLU, 3x3/2 max pooling
/// - 4 stages of 2 basic blocks (64, 128, 256, 512 channels)
/// - Global Average Pooling
/// - Fully connected 512 -> num_classes head
#[derive(Module, Debug)]
pub struct PlantDiseaseNet<B: Backend> {
    conv1: Conv2d<B>,
    bn1: BatchNorm<B, 2>,
    relu: Relu,
    maxpool: MaxPool2d,

    layer1: Vec<BasicBlock<B>>,
    layer2: Vec<BasicBlock<B>>,
    layer3: Vec<BasicBlock<B>>,
    layer4: Vec<BasicBlock<B>>,

    avgpool: AdaptiveAvgPool2d,
    fc: Linear<B>,

    num_classes: usize,
}

impl<B: Backend> PlantDiseaseNet<B> {
    /// Create the network from configuration with freshly initialized weights
    pub fn new(config: &PlantDiseaseNetConfig, device: &B::Device) -> Self {
        let conv1 = Conv2dConfig::new([config.in_channels, 64], [7, 7])
            .with_stride([2, 2])
            .with_padding(PaddingConfig2d::Explicit(3, 3))
            .with_bias(false)
            .init(device);
        let bn1 = BatchNormConfig::new(64).init(device);
        let maxpool = MaxPool2dConfig::new([3, 3])
            .with_strides([2, 2])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init();

        // Stages: 64 -> 128 -> 256 -> 512, two basic blocks each
        let layer1 = Self::make_stage(64, 64, 1, device);
        let layer2 = Self::make_stage(64, 128, 2, device);
        let layer3 = Self::make_stage(128, 256, 2, device);
        let layer4 = Self::make_stage(256, 512, 2, device);

        let avgpool = AdaptiveAvgPool2dConfig::new([1, 1]).init();
        let fc = LinearConfig::new(512, config.num_classes).init(device);

        Self {
            conv1,
            bn1,
            relu: Relu::new(),
            maxpool,
            layer1,
            layer2,
            layer3,
            layer4,
            avgpool,
            fc,
            num_classes: config.num_classes,
        }
    }

    fn make_stage(
        in_channels: usize,
        out_channels: usize,
        stride: usize,
        device: &B::Device,
    ) -> Vec<BasicBlock<B>> {
        vec![
            BasicBlock::new(in_channels, out_channels, stride, device),
            BasicBlock::new(out_channels, out_channels, 1, device),
        ]
    }

    /// Forward pass through the network
    ///
    /// # Arguments
    /// * `x` - Input tensor of shape [batch_size, 3, height, width]
    ///
    /// # Returns
    /// * Logits tensor of shape [batch_size, num_classes]
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.conv1.forward(x);
        let x = self.bn1.forward(x);
        let x = self.relu.forward(x);
        let x = self.maxpool.forward(x);

        let x = forward_stage(&self.layer1, x);
        let x = forward_stage(&self.layer2, x);
        let x = forward_stage(&self.layer3, x);
        let x = forward_stage(&self.layer4, x);

        let x = self.avgpool.forward(x);

        // Flatten: [B, C, 1, 1] -> [B, C]
        let [batch_size, channels, _, _] = x.dims();
        let x = x.reshape([batch_size, channels]);

        self.fc.forward(x)
    }

    /// Forward pass with softmax for inference
    pub fn forward_softmax(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let logits = self.forward(x);
        burn::tensor::activation::softmax(logits, 1)
    }

    /// Get the number of output classes
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }
}

fn forward_stage<B: Backend>(blocks: &[BasicBlock<B>], x: Tensor<B, 4>) -> Tensor<B, 4> {
    blocks.iter().fold(x, |x, block| block.forward(x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{default_device, InferenceBackend};

    type TestBackend = InferenceBackend;

    #[test]
    fn test_output_shape() {
        let device = default_device();
        let config = PlantDiseaseNetConfig::new();
        let model = PlantDiseaseNet::<TestBackend>::new(&config, &device);

        // Adaptive pooling makes the head shape independent of input resolution,
        // so a small input keeps this test fast
        let input = Tensor::<TestBackend, 4>::zeros([1, 3, 64, 64], &device);
        let output = model.forward(input);

        assert_eq!(output.dims(), [1, 38]);
    }

    #[test]
    fn test_softmax_is_a_distribution() {
        let device = default_device();
        let config = PlantDiseaseNetConfig::new();
        let model = PlantDiseaseNet::<TestBackend>::new(&config, &device);

        let input = Tensor::<TestBackend, 4>::zeros([1, 3, 64, 64], &device);
        let output = model.forward_softmax(input);
        let probs: Vec<f32> = output.into_data().to_vec().unwrap();

        assert_eq!(probs.len(), 38);
        assert!(probs.iter().all(|&p| p >= 0.0));
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4, "softmax sums to {sum}");
    }

    #[test]
    fn test_custom_class_count() {
        let device = default_device();
        let config = PlantDiseaseNetConfig::new().with_num_classes(10);
        let model = PlantDiseaseNet::<TestBackend>::new(&config, &device);

        assert_eq!(model.num_classes(), 10);
    }
}
