use thiserror::Error;

/// Result type alias for Wastearr operations
pub type Result<T> = std::result::Result<T, WastearrError>;

/// Errors that can occur during Wastearr operations
#[derive(Error, Debug)]
pub enum WastearrError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing required configuration
    #[error("{0}")]
    ConfigMissing(String),

    /// Service unreachable, timed out, or answered with an unexpected HTTP status
    #[error("Cannot reach {service} at {url}: {message}")]
    Connectivity {
        service: String,
        url: String,
        message: String,
    },

    /// Credential rejected by a service
    #[error("{service} rejected the API key (HTTP {status}). Check {env_var}.")]
    Auth {
        service: String,
        status: u16,
        env_var: String,
    },

    /// Service answered with a payload that does not match the expected schema
    #[error("Unexpected response from {service}: {message}")]
    ResponseFormat { service: String, message: String },

    /// JSON parsing error
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// More than one source failed in the same run
    #[error("{} sources failed:{}", .0.len(), bullet_list(.0))]
    Sources(Vec<WastearrError>),
}

fn bullet_list(errors: &[WastearrError]) -> String {
    errors.iter().map(|e| format!("\n  • {e}")).collect()
}

impl WastearrError {
    /// Create a connectivity error for a service
    pub fn connectivity(
        service: impl Into<String>,
        url: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Connectivity {
            service: service.into(),
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a response format error for a service
    pub fn response_format(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ResponseFormat {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a config missing error with helpful message
    pub fn config_missing(message: impl Into<String>) -> Self {
        Self::ConfigMissing(message.into())
    }

    /// Combine per-source failures into one error, keeping a lone failure as-is
    pub fn from_sources(mut errors: Vec<WastearrError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Sources(errors)),
        }
    }

    /// Process exit code for this error; combined failures use the first one's
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 2,
            Self::Config(_) | Self::ConfigMissing(_) => 3,
            Self::Connectivity { .. } => 4,
            Self::Auth { .. } => 5,
            Self::ResponseFormat { .. } => 6,
            Self::Json(_) | Self::Io(_) => 1,
            Self::Sources(errors) => errors.first().map_or(1, Self::exit_code),
        }
    }
}
