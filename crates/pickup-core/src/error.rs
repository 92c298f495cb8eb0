use thiserror::Error;

#[derive(Debug, Error)]
pub enum PickupError {
    #[error("not initialized: run 'pickup init'")]
    NotInitialized,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("person already exists: {0}")]
    PersonExists(String),

    #[error("person not found: {0}")]
    PersonNotFound(String),

    #[error("'{0}' is not in the roster")]
    PersonInvalid(String),

    #[error("invalid slot '{0}': day index must be 0-5 (Sunday-Friday)")]
    SlotInvalid(String),

    #[error("invalid week key '{0}': expected a Sunday as YYYY-MM-DD")]
    InvalidWeekKey(String),

    #[error("week out of the representable calendar range")]
    WeekOutOfRange,

    #[error("wrong admin password")]
    AuthFailure,

    #[error("admin login required to {0}")]
    Unauthorized(&'static str),

    #[error("no admin password configured")]
    AdminNotConfigured,

    #[error("resetting a week requires explicit confirmation")]
    ConfirmationRequired,

    #[error("table '{table}' is missing required column '{column}'")]
    Schema { table: String, column: String },

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl PickupError {
    /// True for persistence failures: reads degrade on these, writes abort.
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            PickupError::BackendUnavailable(_)
                | PickupError::Schema { .. }
                | PickupError::Io(_)
                | PickupError::Json(_)
                | PickupError::Http(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PickupError>;
