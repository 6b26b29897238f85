//! The uniform `{success, message?, data?}` response envelope.
//!
//! Every backend endpoint wraps its payload in this shape, and
//! `success: false` is an application error regardless of the transport
//! status code.

use serde::Deserialize;

use kycdesk_core::FetchError;

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the envelope, turning `success: false` into an
    /// application error carrying the backend message verbatim.
    pub fn into_data(self, operation: &str) -> Result<Option<T>, FetchError> {
        if !self.success {
            return Err(FetchError::Api(
                self.message.unwrap_or_else(|| format!("{operation} failed")),
            ));
        }
        Ok(self.data)
    }

    /// Like [`into_data`](Self::into_data) but treats a missing payload
    /// on success as a malformed response.
    pub fn require_data(self, operation: &str) -> Result<T, FetchError> {
        self.into_data(operation)?
            .ok_or_else(|| FetchError::Decode(format!("{operation}: missing `data` in envelope")))
    }

    /// For write endpoints whose payload is irrelevant.
    pub fn into_unit(self, operation: &str) -> Result<(), FetchError> {
        self.into_data(operation).map(|_| ())
    }
}
