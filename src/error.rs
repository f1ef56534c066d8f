use thiserror::Error;

/// Errors surfaced by the booking and payment core.
///
/// Date/validation/ownership failures are caller errors and are never retried.
/// `GatewayDeclined` carries the gateway's own message verbatim, while
/// `GatewayUnreachable` marks an outcome-unknown call that the caller may
/// safely retry; the two are never conflated.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),
    #[error("booking dates conflict with an existing booking")]
    DatesUnavailable,
    #[error("transaction reference {0} is already in use")]
    DuplicateReference(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("payment gateway declined: {0}")]
    GatewayDeclined(String),
    #[error("payment gateway unreachable: {0}")]
    GatewayUnreachable(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("storage error: {0}")]
    StorageError(String),
}

pub type Result<T> = std::result::Result<T, BookingError>;

/// Classified failures from the external payment gateway.
///
/// `Declined` is a definite business answer from the provider. The other
/// variants mean the call did not produce a usable answer, so the true
/// transaction outcome is unknown and no payment state may be finalized.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{message}")]
    Declined { message: String },
    #[error("gateway returned HTTP {status}: {body}")]
    BadStatus { status: u16, body: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("unexpected gateway response: {0}")]
    Parse(String),
}

impl GatewayError {
    /// True when the gateway gave a definite business refusal, as opposed to
    /// the call failing with the outcome unknown.
    pub fn is_declined(&self) -> bool {
        matches!(self, GatewayError::Declined { .. })
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Transport(format!("request timed out: {}", err))
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

impl From<GatewayError> for BookingError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Declined { message } => BookingError::GatewayDeclined(message),
            other => BookingError::GatewayUnreachable(other.to_string()),
        }
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for BookingError {
    fn from(err: rocksdb::Error) -> Self {
        BookingError::StorageError(err.to_string())
    }
}
