//! Lampstand library exports: the markup pipeline, the module-library seam
//! and the viewer core.

pub mod core;
pub mod library;
pub mod markup;

#[cfg(test)]
pub mod test_support;
