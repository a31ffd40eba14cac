use thiserror::Error;

/// Errors raised while compiling a filter tree into SQL.
///
/// Every variant except [`FilterError::InternalInvariantViolation`] is caused by
/// malformed or unsupported filter input and should be reported to the client
/// as a bad request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The root filter object has no keys.
    #[error("No filters provided")]
    NoFiltersProvided,

    /// Grouped compilation was requested without any group definitions.
    #[error("No groups provided")]
    NoGroupsProvided,

    /// The grouped root object has more than one key.
    #[error("Only one set operator should be provided as root key, found {0}")]
    MultipleRootOperators(usize),

    /// The grouped root key is not `and`/`or`.
    #[error("Invalid root operator: {0}")]
    InvalidRootOperator(String),

    /// A `not` node wraps something other than exactly one condition.
    #[error("Only one child condition is supported for not operator, found {0}")]
    UnsupportedNotArity(usize),

    /// Grouped mode: the field key is not owned by any group.
    #[error("Invalid filter property: {0}")]
    InvalidFilterProperty(String),

    /// Single-target mode: the field key matches no column or JSON property.
    #[error("Unknown filter key: {0}")]
    UnknownFilterKey(String),

    /// The leaf value is not a single-key operator object.
    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// The first nested segment of a JSON path is not a declared attribute.
    #[error("Unknown {property} attribute: {attribute}")]
    UnknownAttribute { property: String, attribute: String },

    /// A node or operand does not have the JSON shape its position requires.
    #[error("Invalid filter shape: {0}")]
    InvalidFilterShape(String),

    #[error("Internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}

impl FilterError {
    /// Whether the error stems from client input rather than a compiler fault.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, FilterError::InternalInvariantViolation(_))
    }
}
