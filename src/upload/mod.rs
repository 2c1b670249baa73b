//! Upload Module
//!
//! Types describing an accepted upload and the scoped scratch files that hold
//! uploads and page rasters while a request is being processed.
//!
//! Nothing here outlives a request: uploads are written to scratch space,
//! extracted, and removed before the response is sent.

pub mod scratch;
pub mod types;

pub use scratch::ScratchFile;
pub use types::*;
