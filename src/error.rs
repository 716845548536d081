//! Error taxonomy for the tree engine.
//!
//! Structural editing reports failure through its boolean return: a target
//! that is not in the tree is an expected outcome, not an error, and the
//! tree is left unchanged. Real error causes only exist at the snapshot
//! codec seam.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode snapshot: {0}")]
    Decode(#[source] serde_json::Error),
}

pub type TreeResult<T> = Result<T, TreeError>;
