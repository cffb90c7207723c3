//! macaronictl - Kernel and browser package helpers for Macaroni OS
//!
//! Wraps `luet search` to list kernels and kernel modules, and merges the
//! option sets of browser package variants.

pub mod browser;
pub mod config;
pub mod kernel;
pub mod specs;
pub mod utils;

pub use browser::{BrowserError, BrowserOpt, BrowserPackage};
pub use config::Config;
pub use kernel::{parse_kernel_annotations, StoneSearcher};
pub use specs::{KernelAnnotation, Stone, StonesPack};
