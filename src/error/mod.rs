use thiserror::Error;

use crate::config::ValidationErrors;
use crate::data::TableError;
use crate::layout::DescriptorError;

#[derive(Error, Debug)]
pub enum GrowthError {
    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Invalid plate data: {0}")]
    Table(#[from] TableError),
    #[error("Invalid layout descriptor: {0}")]
    Descriptor(#[from] DescriptorError),
}
