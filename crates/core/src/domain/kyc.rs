//! KYC sub-document shapes as the verification backend returns them.
//!
//! These are read-only display payloads: fetched alongside a registrant
//! (or on demand for the registration certificate), never written back.
//! Field inventories mirror the provider responses, so most of them are
//! optional strings.

use serde::{Deserialize, Serialize};

use crate::domain::field::FieldKey;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitAddress {
    pub country: Option<String>,
    pub state: Option<String>,
    pub dist: Option<String>,
    pub pincode: Option<String>,
    pub house: Option<String>,
    pub street: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AadhaarDetail {
    pub aadhar_number: Option<String>,
    pub name: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub care_of: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
    pub year_of_birth: Option<String>,
    pub split_address: Option<SplitAddress>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PanDetail {
    pub pan: Option<String>,
    pub name: Option<String>,
    pub dob: Option<String>,
    pub status: Option<String>,
    pub pan_status: Option<String>,
    pub name_match: Option<String>,
    pub dob_match: Option<String>,
    pub aadhaar_seeding_status: Option<String>,
    pub reference_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DrivingLicenceDetails {
    pub name: Option<String>,
    pub father_or_husband_name: Option<String>,
    pub address: Option<String>,
    pub date_of_issue: Option<String>,
    pub cov_details: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidityWindow {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DlValidity {
    pub non_transport: Option<ValidityWindow>,
    pub transport: Option<ValidityWindow>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DlDetail {
    pub dl_number: Option<String>,
    pub dob: Option<String>,
    pub status: Option<String>,
    pub details_of_driving_licence: Option<DrivingLicenceDetails>,
    pub dl_validity: Option<DlValidity>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BankDetail {
    pub reference_id: Option<String>,
    pub name_at_bank: Option<String>,
    pub bank_name: Option<String>,
    pub branch: Option<String>,
    pub city: Option<String>,
    pub micr: Option<String>,
    pub account_status: Option<String>,
    pub account_status_code: Option<String>,
    pub name_match_score: Option<String>,
    pub name_match_result: Option<String>,
    pub utr: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RcDetail {
    pub reg_no: Option<String>,
    pub vehicle_number: Option<String>,
    pub owner: Option<String>,
    pub vehicle_manufacturer_name: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_colour: Option<String>,
    #[serde(rename = "class")]
    pub vehicle_class: Option<String>,
    pub chassis: Option<String>,
    pub engine: Option<String>,
    pub reg_date: Option<String>,
    pub rc_expiry_date: Option<String>,
    pub rc_status: Option<String>,
    pub vehicle_category: Option<String>,
    pub vehicle_seat_capacity: Option<String>,
    pub vehicle_insurance_company_name: Option<String>,
    pub vehicle_insurance_upto: Option<String>,
    pub vehicle_insurance_policy_number: Option<String>,
}

/// The nested KYC sub-documents embedded in a registrant record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KycDocuments {
    pub aadhaar_detail: Option<AadhaarDetail>,
    pub pan_detail: Option<PanDetail>,
    pub dl_detail: Option<DlDetail>,
    pub bank_detail: Option<BankDetail>,
    pub rc_detail: Option<RcDetail>,
}

/// Resolved display payload for one opened field.
///
/// Transient: produced when an operator opens a field, discarded on
/// close, never cached across fields.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldDetailPayload {
    Aadhaar(AadhaarDetail),
    Pan(PanDetail),
    Dl(DlDetail),
    Bank(BankDetail),
    Rc(RcDetail),
    /// Fallback when no structured sub-document exists for the field:
    /// just the cell label and value the table already shows.
    Plain { label: String, value: String },
}

impl FieldDetailPayload {
    pub fn field_label(&self) -> &str {
        match self {
            Self::Aadhaar(_) => FieldKey::AadhaarDetails.label(),
            Self::Pan(_) => FieldKey::PanDetails.label(),
            Self::Dl(_) => FieldKey::DlDetails.label(),
            Self::Bank(_) => FieldKey::BankDetails.label(),
            Self::Rc(_) => FieldKey::RcDetails.label(),
            Self::Plain { label, .. } => label,
        }
    }
}
