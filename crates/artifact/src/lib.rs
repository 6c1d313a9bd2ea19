//! The model artifact: a fitted regressor plus the metadata the inference
//! pipeline needs to feed it and interpret its output.

mod file;
mod model;

pub use file::ArtifactFile;
pub use model::{ArtifactMetadata, ModelArtifact};
