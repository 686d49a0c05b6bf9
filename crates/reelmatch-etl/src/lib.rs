//! Batch jobs for reelmatch.
//!
//! Links image files to catalog records, embeds records through an
//! external provider, and recommends records for free-text prompts. The
//! two batches are also exposed as treadle `Stage` implementations.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod embed;
pub mod embedding;
pub mod error;
pub mod images;
pub mod link;
pub mod pipeline;
pub mod recommend;
pub mod resilience;
pub mod stages;
pub mod work_item;

pub use config::Config;
pub use embed::{embed_catalog, EmbedReport};
pub use embedding::{EmbeddingProvider, OpenAiEmbedder};
pub use error::{ResolveError, ResolveResult};
pub use images::{FileEnumerator, ImageFolder};
pub use link::{link_images, LinkOptions, LinkReport};
pub use pipeline::build_pipeline;
pub use recommend::{recommend, Recommendation};
pub use stages::{EmbedStage, LinkImagesStage};
pub use work_item::CatalogJob;
