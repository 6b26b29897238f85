//! HTTP implementation of the approval write endpoints.

use async_trait::async_trait;
use serde::Serialize;

use kycdesk_core::domain::registrant::AmbulanceCategory;
use kycdesk_core::{ApprovalState, ApprovalTransport, FetchError, FieldKey, RegistrantId};

use crate::client::BackendClient;
use crate::envelope::ApiEnvelope;

#[derive(Clone, Debug)]
pub struct HttpApprovalTransport {
    client: BackendClient,
}

impl HttpApprovalTransport {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldApprovalBody<'a> {
    driver_id: &'a str,
    field_type: &'a str,
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    remark: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifiedBody {
    is_verified: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AmbulanceTypeBody<'a> {
    ambulance_type: &'a str,
}

#[derive(Debug, Serialize)]
struct AddressBody<'a> {
    address: &'a str,
}

#[async_trait]
impl ApprovalTransport for HttpApprovalTransport {
    async fn post_field_approval(
        &self,
        registrant_id: &RegistrantId,
        field: FieldKey,
        state: ApprovalState,
        remark: Option<&str>,
    ) -> Result<(), FetchError> {
        let body = FieldApprovalBody {
            driver_id: registrant_id.as_str(),
            field_type: field.as_str(),
            status: state.as_str(),
            remark,
        };
        let envelope: ApiEnvelope<serde_json::Value> = self
            .client
            .post_envelope("/driver/approval", &body, "submit approval")
            .await?;
        envelope.into_unit("submit approval")
    }

    async fn set_aadhaar_verified(
        &self,
        registrant_id: &RegistrantId,
        is_verified: bool,
    ) -> Result<(), FetchError> {
        let path = format!("/api/fleetOwner/aadhar/{registrant_id}");
        let envelope: ApiEnvelope<serde_json::Value> = self
            .client
            .put_envelope(&path, &VerifiedBody { is_verified }, "toggle aadhaar verification")
            .await?;
        envelope.into_unit("toggle aadhaar verification")
    }

    async fn set_dl_verified(
        &self,
        registrant_id: &RegistrantId,
        is_verified: bool,
    ) -> Result<(), FetchError> {
        let path = format!("/api/driver/driving-license/{registrant_id}");
        let envelope: ApiEnvelope<serde_json::Value> = self
            .client
            .put_envelope(&path, &VerifiedBody { is_verified }, "toggle dl verification")
            .await?;
        envelope.into_unit("toggle dl verification")
    }

    async fn put_ambulance_category(
        &self,
        vehicle_id: &str,
        category: AmbulanceCategory,
    ) -> Result<(), FetchError> {
        let path = format!("/api/ambulance/{vehicle_id}");
        let body = AmbulanceTypeBody { ambulance_type: category.label() };
        let envelope: ApiEnvelope<serde_json::Value> = self
            .client
            .put_envelope(&path, &body, "update ambulance category")
            .await?;
        envelope.into_unit("update ambulance category")
    }

    async fn put_address(
        &self,
        registrant_id: &RegistrantId,
        address: &str,
    ) -> Result<(), FetchError> {
        let path = format!("/api/fleetOwner/address/{registrant_id}");
        let envelope: ApiEnvelope<serde_json::Value> = self
            .client
            .put_envelope(&path, &AddressBody { address }, "update address")
            .await?;
        envelope.into_unit("update address")
    }
}
