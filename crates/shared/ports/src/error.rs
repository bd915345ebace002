use thiserror::Error;

/// Canonical venue failure kinds understood by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    RequestTimeout,
    ExchangeNotAvailable,
    InsufficientFunds,
    InvalidOrder,
    OrderNotFound,
    BadSymbol,
    RpcError,
    ApprovalError,
    UnsupportedAsset,
    NotSupported,
    /// Catch-all for failures without a more specific kind
    ExchangeError,
}

impl ErrorKind {
    /// Every kind, in declaration order
    pub const ALL: [ErrorKind; 11] = [
        ErrorKind::RequestTimeout,
        ErrorKind::ExchangeNotAvailable,
        ErrorKind::InsufficientFunds,
        ErrorKind::InvalidOrder,
        ErrorKind::OrderNotFound,
        ErrorKind::BadSymbol,
        ErrorKind::RpcError,
        ErrorKind::ApprovalError,
        ErrorKind::UnsupportedAsset,
        ErrorKind::NotSupported,
        ErrorKind::ExchangeError,
    ];
}

/// Venue-level errors raised by adapters
///
/// Adapters translate SDK/REST/RPC failures into exactly one of these.
/// Failures an adapter cannot classify go into [`VenueError::Unclassified`],
/// which the gateway logs as a defect and reports as a generic exchange error.
#[derive(Error, Debug)]
pub enum VenueError {
    #[error("Request timed out: {0}")]
    RequestTimeout(String),

    #[error("Exchange not available: {0}")]
    ExchangeNotAvailable(String),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Bad symbol: {0}")]
    BadSymbol(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Approval failed: {0}")]
    Approval(String),

    #[error("Unsupported asset: {0}")]
    UnsupportedAsset(String),

    #[error("{capability} is not supported by {venue}")]
    NotSupported {
        venue: String,
        capability: &'static str,
    },

    #[error("Exchange error: {0}")]
    Exchange(String),

    #[error("Unclassified venue failure: {0}")]
    Unclassified(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type VenueResult<T> = std::result::Result<T, VenueError>;

impl VenueError {
    /// Wrap a failure the adapter could not map to a canonical kind
    pub fn unclassified(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        VenueError::Unclassified(Box::new(err))
    }

    pub fn not_supported(venue: impl Into<String>, capability: &'static str) -> Self {
        VenueError::NotSupported {
            venue: venue.into(),
            capability,
        }
    }

    /// Canonical kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            VenueError::RequestTimeout(_) => ErrorKind::RequestTimeout,
            VenueError::ExchangeNotAvailable(_) => ErrorKind::ExchangeNotAvailable,
            VenueError::InsufficientFunds(_) => ErrorKind::InsufficientFunds,
            VenueError::InvalidOrder(_) => ErrorKind::InvalidOrder,
            VenueError::OrderNotFound(_) => ErrorKind::OrderNotFound,
            VenueError::BadSymbol(_) => ErrorKind::BadSymbol,
            VenueError::Rpc(_) => ErrorKind::RpcError,
            VenueError::Approval(_) => ErrorKind::ApprovalError,
            VenueError::UnsupportedAsset(_) => ErrorKind::UnsupportedAsset,
            VenueError::NotSupported { .. } => ErrorKind::NotSupported,
            VenueError::Exchange(_) | VenueError::Unclassified(_) => ErrorKind::ExchangeError,
        }
    }

    /// False only for failures the adapter failed to classify
    pub fn is_classified(&self) -> bool {
        !matches!(self, VenueError::Unclassified(_))
    }
}

impl From<mercury_core::OrderValidationError> for VenueError {
    fn from(err: mercury_core::OrderValidationError) -> Self {
        VenueError::InvalidOrder(err.to_string())
    }
}
