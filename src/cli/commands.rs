// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `summary`, `init` and
// `classify`, and all their configurable flags.
//
// Builder hyperparameters are optional flags: when a flag is
// left out the builder's own default applies, so the defaults
// live in one place (the Burn configs in Layer 5).
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::{classify_use_case::ClassifyConfig, init_use_case::InitConfig};
use crate::domain::{sensor::DeviceFormat, shape::InputShape};
use crate::ml::{
    conv_lstm::ConvLstmConfig, lstm::LstmClassifierConfig,
    transformer::TransformerClassifierConfig, Accelerator, ModelConfig,
};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a model and print its layers and parameter count
    Summary(ModelArgs),

    /// Build a model with fresh weights and save it as a checkpoint
    Init(InitArgs),

    /// Classify a sensor recording with a saved checkpoint
    Classify(ClassifyArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchitectureArg {
    /// LSTM → Dropout → Dense → softmax
    Lstm,
    /// Conv1d → LSTM → Dense → sigmoid (binary)
    ConvLstm,
    /// Self-attention encoder blocks → pooling → MLP → softmax
    Transformer,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AcceleratorArg {
    Cpu,
    Gpu,
}

impl From<AcceleratorArg> for Accelerator {
    fn from(a: AcceleratorArg) -> Self {
        match a {
            AcceleratorArg::Cpu => Accelerator::Cpu,
            AcceleratorArg::Gpu => Accelerator::Gpu,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceFormatArg {
    /// Acceleration already in m/s²
    Android,
    /// Acceleration in g
    Ios,
}

impl From<DeviceFormatArg> for DeviceFormat {
    fn from(f: DeviceFormatArg) -> Self {
        match f {
            DeviceFormatArg::Android => DeviceFormat::Android,
            DeviceFormatArg::Ios     => DeviceFormat::Ios,
        }
    }
}

/// Architecture choice, input shape and hyperparameters.
#[derive(Args, Debug)]
pub struct ModelArgs {
    /// Which builder to use
    #[arg(long, value_enum, default_value_t = ArchitectureArg::Transformer)]
    pub arch: ArchitectureArg,

    /// Time steps per window
    #[arg(long, default_value_t = 500)]
    pub timesteps: usize,

    /// Values per time step (one per sensor magnitude)
    #[arg(long, default_value_t = 3)]
    pub features: usize,

    /// Number of output classes (ignored by conv-lstm, which is binary)
    #[arg(long, default_value_t = 9)]
    pub classes: usize,

    /// Recurrent units (lstm, conv-lstm)
    #[arg(long)]
    pub units: Option<usize>,

    /// Dense units before the output layer (lstm, conv-lstm)
    #[arg(long)]
    pub dense_units: Option<usize>,

    /// Convolution filters (conv-lstm)
    #[arg(long)]
    pub filters: Option<usize>,

    /// Dropout rate (lstm, transformer)
    #[arg(long)]
    pub dropout: Option<f64>,

    /// Key size of each attention head (transformer)
    #[arg(long)]
    pub head_size: Option<usize>,

    /// Number of attention heads (transformer)
    #[arg(long)]
    pub num_heads: Option<usize>,

    /// Filters of the first feed-forward convolution (transformer)
    #[arg(long)]
    pub ff_dim: Option<usize>,

    /// Number of encoder blocks (transformer)
    #[arg(long)]
    pub num_transformer_blocks: Option<usize>,

    /// Comma-separated widths of the dense head, e.g. 128,64 (transformer)
    #[arg(long, value_delimiter = ',')]
    pub mlp_units: Option<Vec<usize>>,

    /// Dropout after each dense head layer (transformer)
    #[arg(long)]
    pub mlp_dropout: Option<f64>,
}

/// Convert CLI ModelArgs into the ml-layer ModelConfig.
impl From<ModelArgs> for ModelConfig {
    fn from(a: ModelArgs) -> Self {
        let shape = InputShape::new(a.timesteps, a.features);
        match a.arch {
            ArchitectureArg::Lstm => {
                let mut c = LstmClassifierConfig::new(shape, a.classes);
                if let Some(v) = a.units       { c = c.with_hidden_units(v); }
                if let Some(v) = a.dense_units { c = c.with_dense_units(v); }
                if let Some(v) = a.dropout     { c = c.with_dropout(v); }
                ModelConfig::Lstm(c)
            }
            ArchitectureArg::ConvLstm => {
                let mut c = ConvLstmConfig::new(shape, a.classes);
                if let Some(v) = a.units       { c = c.with_lstm_units(v); }
                if let Some(v) = a.dense_units { c = c.with_dense_units(v); }
                if let Some(v) = a.filters     { c = c.with_filters(v); }
                ModelConfig::ConvLstm(c)
            }
            ArchitectureArg::Transformer => {
                let mut c = TransformerClassifierConfig::new(shape, a.classes);
                if let Some(v) = a.head_size              { c = c.with_head_size(v); }
                if let Some(v) = a.num_heads              { c = c.with_num_heads(v); }
                if let Some(v) = a.ff_dim                 { c = c.with_ff_dim(v); }
                if let Some(v) = a.num_transformer_blocks { c = c.with_num_transformer_blocks(v); }
                if let Some(v) = a.mlp_units              { c = c.with_mlp_units(v); }
                if let Some(v) = a.dropout                { c = c.with_dropout(v); }
                if let Some(v) = a.mlp_dropout            { c = c.with_mlp_dropout(v); }
                ModelConfig::Transformer(c)
            }
        }
    }
}

/// All arguments for the `init` command
#[derive(Args, Debug)]
pub struct InitArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Directory to write the model config and weights to
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

impl From<InitArgs> for InitConfig {
    fn from(a: InitArgs) -> Self {
        InitConfig {
            model:          a.model.into(),
            checkpoint_dir: a.checkpoint_dir,
        }
    }
}

/// All arguments for the `classify` command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// CSV recording: acc_x,acc_y,acc_z,mag_x,mag_y,mag_z,gyr_x,gyr_y,gyr_z
    #[arg(long)]
    pub recording: String,

    /// Directory holding the checkpoint written by `init`
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Directory with acc_mag/mag_mag/gyr_mag scaler JSON files
    #[arg(long)]
    pub scalers_dir: Option<String>,

    /// Where inference runs
    #[arg(long, value_enum, default_value_t = AcceleratorArg::Cpu)]
    pub accelerator: AcceleratorArg,

    /// Platform the recording came from
    #[arg(long, value_enum, default_value_t = DeviceFormatArg::Android)]
    pub device_format: DeviceFormatArg,

    /// Moving-average period applied before scaling
    #[arg(long)]
    pub smoothing: Option<usize>,

    /// Windows per forward pass
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Seconds between two inferences
    #[arg(long, default_value_t = 0.5)]
    pub inference_interval: f64,

    /// Seconds between two readings in the recording
    #[arg(long, default_value_t = 0.01)]
    pub sample_interval: f64,

    /// Predictions printed per window
    #[arg(long, default_value_t = 3)]
    pub top_k: usize,
}

impl From<&ClassifyArgs> for ClassifyConfig {
    fn from(a: &ClassifyArgs) -> Self {
        ClassifyConfig {
            recording:          a.recording.clone(),
            checkpoint_dir:     a.checkpoint_dir.clone(),
            scalers_dir:        a.scalers_dir.clone(),
            accelerator:        a.accelerator.into(),
            device_format:      a.device_format.into(),
            smoothing:          a.smoothing,
            batch_size:         a.batch_size,
            inference_interval: a.inference_interval,
            sample_interval:    a.sample_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::ml::Architecture;
    use clap::Parser;

    #[test]
    fn test_defaults_build_the_transformer() {
        let cli = Cli::parse_from(["shl-architectures", "summary"]);
        let Commands::Summary(args) = cli.command else { panic!("expected summary") };

        let cfg: ModelConfig = args.into();
        assert_eq!(cfg.architecture(), Architecture::Transformer);
        assert_eq!(cfg.input_shape(), InputShape::new(500, 3));
    }

    #[test]
    fn test_overrides_reach_the_config() {
        let cli = Cli::parse_from([
            "shl-architectures", "summary",
            "--arch", "transformer",
            "--num-transformer-blocks", "2",
            "--mlp-units", "64,32",
        ]);
        let Commands::Summary(args) = cli.command else { panic!("expected summary") };

        match ModelConfig::from(args) {
            ModelConfig::Transformer(c) => {
                assert_eq!(c.num_transformer_blocks, 2);
                assert_eq!(c.mlp_units, vec![64, 32]);
                // Untouched flags keep the builder defaults
                assert_eq!(c.head_size, 100);
            }
            other => panic!("unexpected {}", other.architecture()),
        }
    }

    #[test]
    fn test_classify_args_convert() {
        let cli = Cli::parse_from([
            "shl-architectures", "classify",
            "--recording", "walk.csv",
            "--accelerator", "gpu",
            "--device-format", "ios",
        ]);
        let Commands::Classify(args) = cli.command else { panic!("expected classify") };

        let cfg = ClassifyConfig::from(&args);
        assert_eq!(cfg.accelerator, Accelerator::Gpu);
        assert_eq!(cfg.device_format, DeviceFormat::Ios);
        assert_eq!(cfg.recording, "walk.csv");
        assert_eq!(args.top_k, 3);
    }
}
