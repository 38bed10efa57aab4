//! Error types for sizetablib

use thiserror::Error;

/// Errors that can occur while building or diffing a label hierarchy
#[derive(Error, Debug)]
pub enum SizetabError {
    /// A label's parents tuple doesn't span the hierarchy depth
    #[error("label '{label}' has {found} parent(s), hierarchy depth requires {expected}")]
    ParentsDepthMismatch {
        label: String,
        expected: usize,
        found: usize,
    },

    /// Labels sharing a parent path must be contiguous in the input sequence
    #[error("labels under '{path}' are not contiguous: '{label}' appears after the group ended")]
    NonContiguousHierarchy { path: String, label: String },

    /// Diffed reports must describe the same data sources
    #[error("data sources differ between reports: [{left}] vs [{right}]")]
    DataSourceMismatch { left: String, right: String },
}
