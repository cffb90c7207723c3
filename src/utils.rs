//! Small helpers shared by the command modules

use log::debug;
use std::path::PathBuf;

/// Resolve the absolute path of an executable from `PATH`.
///
/// Falls back to the bare name so the spawn error reports what was asked for.
pub fn resolve_binary_abs_path(name: &str) -> PathBuf {
    match which::which(name) {
        Ok(path) => path,
        Err(e) => {
            debug!("Could not resolve {} in PATH: {}", name, e);
            PathBuf::from(name)
        }
    }
}
