use thiserror::Error;

/// Engine-level error type.
///
/// "No match" outcomes are never errors: an empty catalog, unrecognised input
/// or a template with every slot pending are all valid `Ok` results. Only
/// malformed external data and I/O reach this enum.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Malformed template '{template_id}': {reason}")]
    MalformedTemplate { template_id: String, reason: String },

    #[error("Catalog error: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Attachment error: {0}")]
    Attachment(String),

    #[error("Unsupported attachment type: {0}")]
    UnsupportedAttachment(String),
}

impl EngineError {
    pub fn malformed(template_id: &str, reason: impl Into<String>) -> Self {
        EngineError::MalformedTemplate {
            template_id: template_id.to_string(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable code, used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::MalformedTemplate { .. } => "MALFORMED_TEMPLATE",
            EngineError::Catalog(_) => "CATALOG_ERROR",
            EngineError::Io(_) => "IO_ERROR",
            EngineError::Attachment(_) => "ATTACHMENT_ERROR",
            EngineError::UnsupportedAttachment(_) => "UNSUPPORTED_ATTACHMENT",
        }
    }
}
