//! Internal utility functions and helpers.
//!
//! This module contains small helper functions used throughout the crate.
//! It is an implementation detail and not part of the public API.

/// Concatenates two byte slices into a new owned buffer.
///
/// This is used when a held-over partial line has to be joined with data
/// that does not complete it yet, so both can be carried forward as one.
pub(crate) fn combine(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut combined = Vec::with_capacity(a.len() + b.len());
    combined.extend_from_slice(a);
    combined.extend_from_slice(b);
    combined
}
