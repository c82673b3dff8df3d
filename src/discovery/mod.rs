//! Go module discovery: from an import path to the repository behind it.
//!
//! - [`meta`] — `go-import` / `go-source` meta tag extraction.
//! - [`lookup`] — `?go-get=1` requests with module-root and private-repo fallbacks.

pub mod lookup;
pub mod meta;

pub use lookup::lookup;
