use crate::settlement::Prompt;

#[derive(Debug, thiserror::Error)]
pub enum KpiError {
    #[error("Invalid data: {0}")]
    InvalidData(String),
    /// The journal is not in a state that allows the request.
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Decision required: {0}")]
    DecisionRequired(Prompt),
}
