//! ccew-pdf: render NSW Certificate of Compliance for Electrical Work forms as PDF.
//!
//! A flat submission record goes in; a three-page PDF and its filename come
//! out. Pages are either drawn in full or stamped as values-only overlays onto
//! the official template.

pub mod config;
pub mod date;
pub mod document;
pub mod error;
pub mod form;
pub mod layout;
pub mod overlay;
pub mod pdf;
pub mod record;
pub mod render;

pub use config::{RenderConfig, Strategy};
pub use date::localize_date;
pub use document::{
    derive_filename, render, DeliveryPayload, DocumentBuilder, RenderStrategy, RenderedDocument,
    SelfDrawn, TemplateOverlay,
};
pub use error::{ErrorKind, RenderError};
pub use form::FormData;
pub use record::SubmissionRecord;
pub use render::FormPlan;
