//! URL canonicalization and resolution
//!
//! Canonical URLs are the identity underlying every dedup decision in the
//! crawler: seen-sets, the queued-set, and skip checks all compare
//! canonical forms.

mod canonicalize;

pub use canonicalize::{canonicalize, canonicalize_with, resolve};
