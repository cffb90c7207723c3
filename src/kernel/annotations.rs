//! Kernel annotation parsing

use serde_json::{Map, Value};

use crate::specs::{KernelAnnotation, Stone};

/// Annotation key carrying the kernel metadata
pub const KERNEL_ANNOTATION: &str = "kernel";

/// Error raised when a stone has no usable kernel annotation
#[derive(Debug, thiserror::Error)]
pub enum AnnotationError {
    #[error("[{category}/{name}] No kernel annotation key found")]
    MissingAnnotation { category: String, name: String },

    #[error("[{category}/{name}] Error on cast annotations fields")]
    InvalidAnnotationShape { category: String, name: String },
}

/// Read the kernel annotation of a stone.
///
/// Only a missing or non-object `kernel` entry is an error. Each field
/// that is absent or has the wrong type keeps its default value.
pub fn parse_kernel_annotations(stone: &Stone) -> Result<KernelAnnotation, AnnotationError> {
    let fields = match stone.annotations.get(KERNEL_ANNOTATION) {
        None => {
            return Err(AnnotationError::MissingAnnotation {
                category: stone.category.clone(),
                name: stone.name.clone(),
            })
        }
        Some(Value::Object(fields)) => fields,
        Some(_) => {
            return Err(AnnotationError::InvalidAnnotationShape {
                category: stone.category.clone(),
                name: stone.name.clone(),
            })
        }
    };

    Ok(KernelAnnotation {
        eol: string_field(fields, "eol"),
        lts: fields.get("lts").and_then(Value::as_bool).unwrap_or_default(),
        released: string_field(fields, "released"),
        suffix: string_field(fields, "suffix"),
        kernel_type: string_field(fields, "type"),
    })
}

fn string_field(fields: &Map<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}
