//! Field-level approval submission: local validation, endpoint routing,
//! and the transport seam the HTTP client implements.

pub mod cache;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::field::{ApprovalRoute, FieldKey};
use crate::domain::registrant::{AmbulanceCategory, RegistrantId};
use crate::errors::{ApprovalError, FetchError, ValidationError};

/// Tri-state verification outcome for one field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalState {
    Accepted,
    Declined,
    Pending,
}

impl ApprovalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "ACCEPTED",
            Self::Declined => "DECLINED",
            Self::Pending => "PENDING",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ACCEPTED" => Some(Self::Accepted),
            "DECLINED" => Some(Self::Declined),
            "PENDING" => Some(Self::Pending),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApprovalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Most-recent-wins approval value for one (registrant, field) pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalStatus {
    pub state: ApprovalState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl ApprovalStatus {
    /// The universal default: any field with no recorded status is
    /// pending, never absent.
    pub fn pending() -> Self {
        Self { state: ApprovalState::Pending, remark: None }
    }

    pub fn accepted() -> Self {
        Self { state: ApprovalState::Accepted, remark: None }
    }

    pub fn declined(remark: impl Into<String>) -> Self {
        Self { state: ApprovalState::Declined, remark: Some(remark.into()) }
    }
}

impl Default for ApprovalStatus {
    fn default() -> Self {
        Self::pending()
    }
}

/// One submission as an operator issues it, before validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApprovalSubmission {
    pub registrant_id: RegistrantId,
    pub field: FieldKey,
    pub state: ApprovalState,
    pub remark: Option<String>,
}

impl ApprovalSubmission {
    /// Declines without a usable remark never reach the network layer.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.state == ApprovalState::Declined
            && self.remark.as_deref().map_or(true, |remark| remark.trim().is_empty())
        {
            return Err(ValidationError::RemarkRequired { field: self.field });
        }
        Ok(())
    }
}

/// Raw backend write operations behind the dispatcher.
///
/// Implementations speak HTTP; routing and validation stay on this side
/// of the seam so they are testable without a network.
#[async_trait]
pub trait ApprovalTransport: Send + Sync {
    /// Generic per-field approval write
    /// (`POST /driver/approval {driverId, fieldType, status, remark?}`).
    async fn post_field_approval(
        &self,
        registrant_id: &RegistrantId,
        field: FieldKey,
        state: ApprovalState,
        remark: Option<&str>,
    ) -> Result<(), FetchError>;

    /// `PUT /api/fleetOwner/aadhar/:id {isVerified}`.
    async fn set_aadhaar_verified(
        &self,
        registrant_id: &RegistrantId,
        is_verified: bool,
    ) -> Result<(), FetchError>;

    /// `PUT /api/driver/driving-license/:id {isVerified}`.
    async fn set_dl_verified(
        &self,
        registrant_id: &RegistrantId,
        is_verified: bool,
    ) -> Result<(), FetchError>;

    /// `PUT /api/ambulance/:id {ambulanceType}`.
    async fn put_ambulance_category(
        &self,
        vehicle_id: &str,
        category: AmbulanceCategory,
    ) -> Result<(), FetchError>;

    /// `PUT /api/fleetOwner/address/:id {address}`.
    async fn put_address(&self, registrant_id: &RegistrantId, address: &str)
        -> Result<(), FetchError>;
}

/// Validates a submission, selects the backend path for its field, and
/// forwards it. Resubmission is an idempotent overwrite; the backend's
/// most-recent-wins semantics make duplicate detection unnecessary.
#[derive(Clone, Debug)]
pub struct ApprovalDispatcher<T> {
    transport: T,
}

impl<T> ApprovalDispatcher<T>
where
    T: ApprovalTransport,
{
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn submit(&self, submission: &ApprovalSubmission) -> Result<(), ApprovalError> {
        submission.validate()?;

        match ApprovalRoute::for_field(submission.field) {
            ApprovalRoute::Generic => {
                self.transport
                    .post_field_approval(
                        &submission.registrant_id,
                        submission.field,
                        submission.state,
                        submission.remark.as_deref(),
                    )
                    .await?;
            }
            ApprovalRoute::AadhaarToggle => {
                // The toggle endpoint has no remark field; a decline
                // remark stays in the structured log only.
                if let Some(remark) = submission.remark.as_deref() {
                    tracing::info!(
                        registrant_id = %submission.registrant_id,
                        field = %submission.field,
                        remark,
                        "remark recorded locally for toggle-routed field"
                    );
                }
                self.transport
                    .set_aadhaar_verified(
                        &submission.registrant_id,
                        submission.state == ApprovalState::Accepted,
                    )
                    .await?;
            }
            ApprovalRoute::DlToggle => {
                if let Some(remark) = submission.remark.as_deref() {
                    tracing::info!(
                        registrant_id = %submission.registrant_id,
                        field = %submission.field,
                        remark,
                        "remark recorded locally for toggle-routed field"
                    );
                }
                self.transport
                    .set_dl_verified(
                        &submission.registrant_id,
                        submission.state == ApprovalState::Accepted,
                    )
                    .await?;
            }
        }

        tracing::info!(
            registrant_id = %submission.registrant_id,
            field = %submission.field,
            state = %submission.state,
            "approval submitted"
        );
        Ok(())
    }

    /// Reassign a vehicle's ambulance category.
    pub async fn update_ambulance_category(
        &self,
        vehicle_id: &str,
        category: Option<AmbulanceCategory>,
    ) -> Result<(), ApprovalError> {
        let category = category.ok_or(ValidationError::MissingCategory)?;
        self.transport.put_ambulance_category(vehicle_id, category).await?;
        Ok(())
    }

    /// Correct a registrant's free-text address.
    pub async fn update_address(
        &self,
        registrant_id: &RegistrantId,
        address: &str,
    ) -> Result<(), ApprovalError> {
        if address.trim().is_empty() {
            return Err(ValidationError::EmptyAddress.into());
        }
        self.transport.put_address(registrant_id, address).await?;
        Ok(())
    }
}
