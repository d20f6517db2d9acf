/// Process-level error: a message plus the exit code `approval` terminates with.
///
/// Exit codes:
/// - `2` the dataset could not be read (missing file, network failure, bad header)
/// - `3` the dataset was read but no usable rows remain
/// - `4` terminal or rendering failure
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

    /// The dataset resource is unreachable or unparseable.
    pub fn data_load(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::new(4, message)
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
