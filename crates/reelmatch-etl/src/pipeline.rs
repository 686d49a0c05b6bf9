use std::path::PathBuf;
use std::sync::Arc;

use treadle::Workflow;

use crate::embedding::EmbeddingProvider;
use crate::link::LinkOptions;
use crate::{EmbedStage, LinkImagesStage};

/// Build the link-images → embed pipeline.
///
/// # Errors
/// Returns an error if the workflow cannot be built.
pub fn build_pipeline(
    image_folder: PathBuf,
    db_path: PathBuf,
    options: LinkOptions,
    provider: Arc<dyn EmbeddingProvider>,
) -> treadle::Result<Workflow> {
    let link_stage = LinkImagesStage::new(image_folder, db_path.clone(), options);
    let embed_stage = EmbedStage::new(db_path, provider, false);

    Workflow::builder()
        .stage("link-images", link_stage)
        .stage("embed", embed_stage)
        .dependency("embed", "link-images")
        .build()
}
