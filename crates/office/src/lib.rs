//! Headless office suite backend for converting presentations to PDF.
//!
//! Shells out to LibreOffice (`soffice --headless --convert-to pdf`), which
//! handles both legacy `.ppt` and `.pptx` input.

pub mod soffice;

pub use soffice::SofficeConverter;
