// Document builder: strategy selection, byte production and filename derivation.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::{RenderConfig, Strategy};
use crate::error::RenderError;
use crate::form::FormData;
use crate::overlay::{composite, load_template};
use crate::pdf::{paint, PaintScope};
use crate::record::SubmissionRecord;
use crate::render::FormPlan;

/// Stands in for the serial number when the record has none.
pub const UNKNOWN_SERIAL: &str = "UNKNOWN";

pub const PDF_MIME_TYPE: &str = "application/pdf";

// ============================================================================
// Strategies
// ============================================================================

/// Turns a laid-out form into PDF bytes.
pub trait RenderStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn paint(&self, plan: &FormPlan) -> Result<Vec<u8>, RenderError>;
}

/// Draws the whole form, bands and labels included. Needs no template.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfDrawn;

impl RenderStrategy for SelfDrawn {
    fn name(&self) -> &'static str {
        "self-drawn"
    }

    fn paint(&self, plan: &FormPlan) -> Result<Vec<u8>, RenderError> {
        paint(plan, PaintScope::Full)
    }
}

/// Draws values only and stamps them onto the official template.
#[derive(Debug, Clone)]
pub struct TemplateOverlay {
    template: Vec<u8>,
}

impl TemplateOverlay {
    /// Fetch the template up front so a bad location fails before any page is drawn.
    pub fn load(location: &str) -> Result<Self, RenderError> {
        Ok(Self::from_bytes(load_template(location)?))
    }

    pub fn from_bytes(template: Vec<u8>) -> Self {
        Self { template }
    }
}

impl RenderStrategy for TemplateOverlay {
    fn name(&self) -> &'static str {
        "overlay"
    }

    fn paint(&self, plan: &FormPlan) -> Result<Vec<u8>, RenderError> {
        let overlay = paint(plan, PaintScope::VariableOnly)?;
        composite(&self.template, &overlay)
    }
}

// ============================================================================
// Output
// ============================================================================

/// A finished PDF and the name it should be delivered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl RenderedDocument {
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    pub fn payload(&self) -> DeliveryPayload {
        DeliveryPayload {
            filename: self.filename.clone(),
            mime_type: PDF_MIME_TYPE.to_string(),
            content_base64: self.to_base64(),
        }
    }
}

/// JSON envelope handed to the delivery side (webhook or mailer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPayload {
    pub filename: String,
    pub mime_type: String,
    pub content_base64: String,
}

impl DeliveryPayload {
    pub fn decode_content(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.content_base64)
    }
}

/// `{prefix}_{serial}.pdf`, serial verbatim.
pub fn derive_filename(prefix: &str, serial: Option<&str>) -> String {
    format!("{}_{}.pdf", prefix, serial.unwrap_or(UNKNOWN_SERIAL))
}

// ============================================================================
// Builder
// ============================================================================

pub struct DocumentBuilder {
    strategy: Box<dyn RenderStrategy>,
    filename_prefix: String,
}

impl DocumentBuilder {
    pub fn new(strategy: impl RenderStrategy + 'static) -> Self {
        Self {
            strategy: Box::new(strategy),
            filename_prefix: crate::config::DEFAULT_FILENAME_PREFIX.to_string(),
        }
    }

    pub fn with_filename_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.filename_prefix = prefix.into();
        self
    }

    /// Validate the config and prepare its strategy (loading the template for overlays).
    pub fn from_config(config: &RenderConfig) -> Result<Self, RenderError> {
        config.validate()?;
        let builder = match (config.strategy, config.template.as_deref()) {
            (Strategy::SelfDrawn, _) => Self::new(SelfDrawn),
            (Strategy::Overlay, Some(location)) => Self::new(TemplateOverlay::load(location)?),
            (Strategy::Overlay, None) => {
                return Err(RenderError::Config(
                    "the overlay strategy needs a template path or URL".to_string(),
                ))
            }
        };
        Ok(builder.with_filename_prefix(config.filename_prefix.clone()))
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn render(&self, record: &SubmissionRecord) -> Result<RenderedDocument, RenderError> {
        let serial = record.serial_no();
        let filename = derive_filename(&self.filename_prefix, serial.as_deref());
        info!(
            "Rendering CCEW {} with the {} strategy",
            serial.as_deref().unwrap_or(UNKNOWN_SERIAL),
            self.strategy.name()
        );

        let form = FormData::from_record(record);
        let plan = FormPlan::build(&form);
        let bytes = self.strategy.paint(&plan)?;

        debug!("{}: {} bytes", filename, bytes.len());
        Ok(RenderedDocument { filename, bytes })
    }
}

/// One-shot render with the given settings.
pub fn render(
    record: &SubmissionRecord,
    config: &RenderConfig,
) -> Result<RenderedDocument, RenderError> {
    DocumentBuilder::from_config(config)?.render(record)
}
