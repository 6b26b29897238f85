use thiserror::Error;

use crate::domain::field::FieldKey;

/// Local pre-submission failures. Caught before any network call and
/// never transmitted to the backend.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("declining `{field}` requires a non-empty remark")]
    RemarkRequired { field: FieldKey },
    #[error("address must not be empty")]
    EmptyAddress,
    #[error("an ambulance category must be selected")]
    MissingCategory,
}

/// Failure of a backend read or write.
///
/// `Api` covers `success: false` envelopes, whose message is shown to
/// the operator verbatim; both variants end in a retriable state.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("{0}")]
    Api(String),
    #[error("malformed backend response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Message suitable for direct operator display next to a retry
    /// affordance.
    pub fn display_message(&self) -> String {
        self.to_string()
    }
}

/// Failure of an approval submission, distinguishing local validation
/// from backend trouble so callers can skip the retry affordance for
/// the former.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApprovalError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Backend(#[from] FetchError),
}

impl ApprovalError {
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}
