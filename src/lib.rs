pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::toml_config::TomlConfig;

pub use adapters::{generator_from_config, FileTemplateSource, HttpRenderEngine, LocalArtifactStore, LocalContractGenerator};
pub use core::{
    contract::{ContractGenerator, GeneratedContract, GenerationResponse},
    normalizer::Normalizer,
    template::{RenderedTemplate, TemplateRenderer},
};
pub use domain::{model::BookingRecord, ports::PageLayout, submission::Submission};
pub use utils::error::{ContractError, Result};
