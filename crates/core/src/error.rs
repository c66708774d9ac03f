use thiserror::Error;

/// Result type for rankdup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for rankdup operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited-file reader/writer errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A TSV/CSV row that does not match the expected layout
    #[error("Malformed record in {source_name} at line {line}: {message}")]
    MalformedRecord {
        source_name: String,
        line: u64,
        message: String,
    },

    /// A query or document id referenced on one side is absent on the other
    #[error("Missing key: {0}")]
    MissingKey(String),

    /// A ratio whose denominator is zero
    #[error("Division undefined: {0}")]
    DivisionUndefined(String),

    /// An aggregate requested over an empty collection
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Any other error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a malformed record error
    pub fn malformed(
        source_name: impl Into<String>,
        line: u64,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedRecord {
            source_name: source_name.into(),
            line,
            message: message.into(),
        }
    }

    /// Creates a missing key error
    pub fn missing_key(msg: impl Into<String>) -> Self {
        Self::MissingKey(msg.into())
    }

    /// Creates a division undefined error
    pub fn division_undefined(msg: impl Into<String>) -> Self {
        Self::DivisionUndefined(msg.into())
    }

    /// Creates an empty input error
    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    /// Creates an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Adds context to any error
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::with_context(context, e))
    }
}
