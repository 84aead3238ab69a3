//! Centralized error types for the FishWx widget layer.
//!
//! None of these ever reach the widget surface: the renderer always falls back
//! to placeholder text. They exist so host adapters and the console host can
//! log precisely what went wrong and decide what to swallow.

use thiserror::Error;

/// Top-level error type.
///
/// Use `user_message()` to get a message suitable for a status line.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Host platform error: {0}")]
    Host(#[from] HostError),

    #[error("Snapshot store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Host(e) => e.user_message(),
            AppError::Store(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Errors reported by the host widget platform.
///
/// Every variant is recoverable: teardown paths swallow them, and a failed
/// submit only affects the one instance it was meant for.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Broadcast receiver already registered")]
    ReceiverAlreadyRegistered,

    #[error("Broadcast receiver not registered")]
    ReceiverNotRegistered,

    #[error("Widget instance {0} rejected the update")]
    SubmitRejected(i32),

    #[error("Widget instance {0} no longer exists")]
    InstanceGone(i32),

    #[error("Notification channel denied: {0}")]
    NotificationDenied(String),

    #[error("Host service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl HostError {
    pub fn user_message(&self) -> &'static str {
        match self {
            HostError::ReceiverAlreadyRegistered | HostError::ReceiverNotRegistered => {
                "Widget clock updates may be delayed."
            }
            HostError::SubmitRejected(_) | HostError::InstanceGone(_) => {
                "The widget could not be updated. It will retry shortly."
            }
            HostError::NotificationDenied(_) => {
                "Background updates may stop when the system is low on memory."
            }
            HostError::ServiceUnavailable(_) => "The widget host is unavailable.",
        }
    }

    /// True if the error means the target instance should be skipped from now on.
    pub fn is_instance_gone(&self) -> bool {
        matches!(self, HostError::InstanceGone(_))
    }
}

/// Errors reading the shared snapshot written by the main application.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read snapshot store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed snapshot store: {0}")]
    Malformed(String),
}

impl StoreError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StoreError::Io(_) => "Weather data is not available yet. Open the app to refresh.",
            StoreError::Malformed(_) => "Weather data is damaged. Open the app to refresh.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration not found. Using defaults.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}
