//! ZIP archive sink for converted PDFs.
//!
//! Produced PDFs are stored flat (base file name only) with deflate
//! compression, in the order they were converted.

pub mod writer;

pub use writer::{open_session, ZipArchiveWriter};
