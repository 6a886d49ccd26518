// Domain errors - Error types raised at the port boundaries

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// File not found
    FileNotFound(String),
    /// Video could not be opened or decoded
    DecodeFail(String),
    /// File system operation failed
    FsFail(String),
    /// Image could not be fingerprinted
    FingerprintFail(String),
    /// Content provider call failed
    ContentFail(String),
    /// Document could not be assembled
    DocumentFail(String),
    /// Configuration could not be loaded or is invalid
    ConfigFail(String),
    /// Processing error
    ProcessingError(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::FileNotFound(msg) => write!(f, "File not found: {}", msg),
            DomainError::DecodeFail(msg) => write!(f, "Decode failed: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::FingerprintFail(msg) => write!(f, "Fingerprint failed: {}", msg),
            DomainError::ContentFail(msg) => write!(f, "Content generation failed: {}", msg),
            DomainError::DocumentFail(msg) => write!(f, "Document build failed: {}", msg),
            DomainError::ConfigFail(msg) => write!(f, "Configuration error: {}", msg),
            DomainError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
