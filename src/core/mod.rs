pub mod contract;
pub mod normalizer;
pub mod render;
pub mod template;

pub use crate::domain::model::BookingRecord;
pub use crate::domain::ports::{ArtifactStore, ConfigProvider, RenderEngine, RenderSession, TemplateSource};
pub use crate::utils::error::Result;
