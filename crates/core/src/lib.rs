pub mod config;
pub mod converter;
pub mod inspector;
pub mod metrics;
pub mod placer;
pub mod processor;
pub mod settings;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, AudioConfig, Config, ConfigError,
    OutputConfig, ProgrammeConfig,
};
pub use converter::{
    CommandBuilder, ConverterConfig, ConverterError, FfmpegTranscoder, OutputFormat, QualityTier,
    TranscodeOutput, Transcoder,
};
pub use inspector::{FfprobeInspector, MediaInfo, MediaProbe};
pub use placer::{DestinationLock, LockAttempt, PlacerError, StagingFile};
pub use processor::{
    AudioPipeline, BatchReport, ItemReport, PipelineError, ProcessOutcome, ProcessingRequest,
    RunTotals,
};
pub use settings::{EffectiveSettings, EndTrim, ItemOverrides};
