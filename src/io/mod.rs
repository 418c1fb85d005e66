//! File export for finished meshes.

#[cfg(feature = "stl-io")]
pub mod stl;
