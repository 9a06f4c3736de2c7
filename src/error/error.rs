//! Error types and handling for the discovery server

use thiserror::Error;

/// Result type alias for discovery operations
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Broad classification of a [`DiscoveryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Unauthorized,
    Forbidden,
    Internal,
    Configuration,
    Provider,
    Network,
    Timeout,
}

impl ErrorKind {
    /// Stable snake_case tag used in logs and error payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Internal => "internal",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Provider => "provider",
            ErrorKind::Network => "network",
            ErrorKind::Timeout => "timeout",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for the discovery server
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Configuration errors (unreadable files, duplicate factory registration)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Malformed or incomplete configuration
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Unknown provider type or instance
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// A named provider failed to construct or enumerate its tools
    #[error("Provider error: {provider}: {message}")]
    Provider {
        provider: String,
        message: String,
        #[source]
        source: Option<Box<DiscoveryError>>,
    },

    /// Reserved for downstream use
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Reserved for downstream use
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Reserved for downstream use
    #[error("Network error: {message}")]
    Network { message: String },

    /// Reserved for downstream use
    #[error("Timeout: {operation}")]
    Timeout { operation: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DiscoveryError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an error for a provider type with no registered factory
    pub fn unknown_provider_type(provider_type: &str) -> Self {
        Self::not_found(format!("unknown provider type: {}", provider_type))
    }

    /// Create a provider error without an underlying cause
    pub fn provider<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an error raised while working with the named provider
    pub fn wrap_provider<P: Into<String>, S: Into<String>>(
        provider: P,
        message: S,
        cause: DiscoveryError,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: format!("{}: {}", message.into(), cause),
            source: Some(Box::new(cause)),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden<S: Into<String>>(message: S) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DiscoveryError::Config { .. } => ErrorKind::Configuration,
            DiscoveryError::Validation { .. } => ErrorKind::Validation,
            DiscoveryError::NotFound { .. } => ErrorKind::NotFound,
            DiscoveryError::Provider { .. } => ErrorKind::Provider,
            DiscoveryError::Unauthorized { .. } => ErrorKind::Unauthorized,
            DiscoveryError::Forbidden { .. } => ErrorKind::Forbidden,
            DiscoveryError::Network { .. } => ErrorKind::Network,
            DiscoveryError::Timeout { .. } => ErrorKind::Timeout,
            DiscoveryError::Yaml(_) => ErrorKind::Configuration,
            DiscoveryError::Io(_) | DiscoveryError::Serde(_) | DiscoveryError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Provider name carried by provider errors
    pub fn provider_name(&self) -> Option<&str> {
        match self {
            DiscoveryError::Provider { provider, .. } => Some(provider),
            _ => None,
        }
    }

    /// HTTP status code that best represents this error
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::Timeout => 408,
            ErrorKind::Configuration => 500,
            ErrorKind::Provider => 502,
            ErrorKind::Network => 503,
            ErrorKind::Internal => 500,
        }
    }
}

impl actix_web::ResponseError for DiscoveryError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::from_u16(DiscoveryError::status_code(self))
            .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(actix_web::ResponseError::status_code(self)).json(
            serde_json::json!({
                "error": {
                    "type": self.kind().as_str(),
                    "message": self.to_string(),
                }
            }),
        )
    }
}
