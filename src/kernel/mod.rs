//! Kernel queries for Macaroni OS
//!
//! Kernels and kernel modules are regular packages tagged with a `kernel`
//! or `kernel_module` annotation. This module finds them through
//! `luet search` and reads the kernel metadata they carry.

use log::warn;
use serde::Serialize;

use crate::specs::{KernelAnnotation, Stone, StonesPack};

pub mod annotations;
pub mod search;

pub use annotations::{parse_kernel_annotations, AnnotationError};
pub use search::{SearchError, SearchQuery, StoneSearcher};

/// A kernel package with its parsed annotation
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct KernelEntry {
    pub package: String,
    pub version: String,
    pub repository: String,
    pub annotation: KernelAnnotation,
}

impl KernelEntry {
    /// Build an entry, leaving the annotation empty when it cannot be read
    pub fn from_stone(stone: &Stone) -> Self {
        let annotation = parse_kernel_annotations(stone).unwrap_or_else(|e| {
            warn!("{}", e);
            KernelAnnotation::default()
        });

        Self {
            package: stone.package_name(),
            version: stone.version.clone(),
            repository: stone.repository.clone(),
            annotation,
        }
    }
}

/// Entries for every stone of a search result
pub fn kernel_entries(pack: &StonesPack) -> Vec<KernelEntry> {
    pack.stones.iter().map(KernelEntry::from_stone).collect()
}
