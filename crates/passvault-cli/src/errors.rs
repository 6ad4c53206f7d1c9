//! User-facing errors and exit codes.

use std::fmt;

use passvault_core::VaultError;

use crate::ui::{badge, Badge, UiContext};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const NOT_FOUND: i32 = 3;
    pub const INVALID_INPUT: i32 = 4;
    pub const AUTH_FAILED: i32 = 5;
    pub const CORRUPT: i32 = 6;
}

/// An error with a message, an optional hint and an exit code.
#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub hint: Option<String>,
    pub code: i32,
}

impl CliError {
    pub fn new(message: impl Into<String>, code: i32) -> Self {
        Self {
            message: message.into(),
            hint: None,
            code,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::new(message, exit_code::NOT_FOUND).with_hint(hint)
    }

    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::new(message, exit_code::AUTH_FAILED)
    }

    /// Error badge and message, then the hint on its own lines.
    pub fn render(&self, ui: &UiContext) -> String {
        let line = badge(ui, Badge::Err, &self.message);
        match &self.hint {
            Some(hint) => format!("{}\n{}", line, hint),
            None => line,
        }
    }

    /// Print to stderr and exit the process.
    pub fn exit(&self, ui: &UiContext) -> ! {
        eprintln!("{}", self.render(ui));
        std::process::exit(self.code)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

impl From<&VaultError> for CliError {
    fn from(err: &VaultError) -> Self {
        match err {
            VaultError::AuthenticationFailure => {
                CliError::auth_failed("Incorrect passphrase or corrupted vault.")
            }
            VaultError::ContainerNotFound(path) => CliError::not_found(
                format!("No vault found at {}", path.display()),
                "Run:\n  passvault init\n\nOr point at an existing vault:\n  PASSVAULT_PATH=/path/to/vault.pvlt passvault list",
            ),
            VaultError::RecordNotFound(id) => CliError::not_found(
                format!("Record not found: {}", id),
                "Hint: Run `passvault list` to find record IDs.",
            ),
            VaultError::Format(_) => CliError::new(err.to_string(), exit_code::CORRUPT),
            VaultError::InvalidInput(_)
            | VaultError::Validation(_)
            | VaultError::ContainerExists(_)
            | VaultError::DuplicateRecord(_) => {
                CliError::new(err.to_string(), exit_code::INVALID_INPUT)
            }
            _ => CliError::new(err.to_string(), exit_code::GENERAL),
        }
    }
}

/// Map any error chain to a `CliError`, looking through `anyhow` wrappers.
pub fn classify(err: &anyhow::Error) -> CliError {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return CliError {
            message: cli.message.clone(),
            hint: cli.hint.clone(),
            code: cli.code,
        };
    }
    for cause in err.chain() {
        if let Some(vault) = cause.downcast_ref::<VaultError>() {
            return CliError::from(vault);
        }
    }
    CliError::new(format!("{:#}", err), exit_code::GENERAL)
}
