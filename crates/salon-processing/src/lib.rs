//! Upload validation and media-derivation pipeline.
//!
//! The flow per upload is linear with two branches:
//! sniff → spool (bounded read) → finalize → derive thumbnail, with a
//! duration probe and ceiling check between finalization and thumbnailing
//! for video. All input is treated as untrusted; every stage cleans up the
//! files it created before propagating its error.

pub mod error;
pub mod finalize;
pub mod image_thumb;
pub mod pipeline;
pub mod probe;
pub mod sniff;
pub mod spool;

pub use error::MediaError;
pub use finalize::StoredAsset;
pub use pipeline::{ImageUpload, MediaPipeline, VideoUpload};
pub use probe::{FfmpegProber, MediaProber};
pub use sniff::sniff_media_type;
pub use spool::SpooledUpload;
