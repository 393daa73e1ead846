// Adapters layer: concrete implementations of the domain ports (render service over HTTP,
// local artifact storage, template files).

pub mod render_service;
pub mod storage;
pub mod template_file;

pub use render_service::{HttpRenderEngine, HttpRenderSession};
pub use storage::LocalArtifactStore;
pub use template_file::FileTemplateSource;

use crate::core::contract::ContractGenerator;
use crate::domain::ports::ConfigProvider;

pub type LocalContractGenerator = ContractGenerator<FileTemplateSource, HttpRenderEngine, LocalArtifactStore>;

/// 依設定組裝預設的 adapters
pub fn generator_from_config<C: ConfigProvider>(config: &C, monitor_enabled: bool) -> LocalContractGenerator {
    ContractGenerator::new_with_monitoring(
        FileTemplateSource::new(config.template_path()),
        HttpRenderEngine::new(config.render_endpoint()),
        LocalArtifactStore::new(config.output_dir(), config.public_prefix()),
        config.page_layout(),
        config.render_timeout(),
        monitor_enabled,
    )
}
