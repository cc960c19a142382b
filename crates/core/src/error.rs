use chart_types::TypeError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatientError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<TypeError> for PatientError {
    fn from(err: TypeError) -> Self {
        PatientError::Validation(err.to_string())
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
