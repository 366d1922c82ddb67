/// Application-level failure carrying the process exit code.
///
/// Exit codes:
/// - 2: usage/configuration (bad flags, unknown view)
/// - 4: runtime (terminal, export I/O)
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Why a resource could not be turned into records.
///
/// These never abort a view: the loader converts them into a message and an
/// empty dataset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The request never produced a response (DNS, connect, I/O).
    #[error("{0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("HTTP {0}")]
    Status(u16),
    /// The body is not valid JSON.
    #[error("Invalid JSON: {0}")]
    Parse(String),
    /// Valid JSON, but not a top-level array of objects.
    #[error("Expected a JSON array of records, got {0}")]
    Shape(String),
}
