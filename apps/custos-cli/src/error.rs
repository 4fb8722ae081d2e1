//! CLI error types and exit codes

use custos_store::StoreError;
use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General error (I/O, configuration)
/// - 4: Validation error, missing resource, conflict
/// - 5: Service error (quota, network, permission, 5xx)
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No identity registered for {0}")]
    IdentityNotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation(_)
            | CliError::NotFound(_)
            | CliError::IdentityNotFound(_)
            | CliError::Conflict(_) => 4,
            CliError::Service(_) => 5,
            CliError::Config(_) | CliError::Io(_) => 1,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    /// Get a suggested action for this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::IdentityNotFound(_) => {
                Some("The account must register in the app first, then run this command again.")
            }
            CliError::Config(_) => Some(
                "Set CUSTOS_ENDPOINT and CUSTOS_API_KEY, or add them to config.json in the custos config directory.",
            ),
            CliError::Service(_) => Some("Check the service status and try again in a few moments."),
            _ => None,
        }
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(msg) => CliError::Validation(msg),
            StoreError::NotFound { kind: "identity", key } => CliError::IdentityNotFound(key),
            StoreError::NotFound { kind, key } => CliError::NotFound(format!("{kind} {key}")),
            StoreError::AlreadyExists { kind, key } => {
                CliError::Conflict(format!("{kind} {key} already exists"))
            }
            StoreError::Transient(msg) => CliError::Service(msg),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Io(err.to_string())
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        CliError::Io(err.to_string())
    }
}
