use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::kyc::KycDocuments;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrantId(pub String);

impl RegistrantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RegistrantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which backend collection a registrant belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrantType {
    Driver,
    FleetOwner,
}

impl RegistrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driver => "DRIVER",
            Self::FleetOwner => "FLEET_OWNER",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "DRIVER" => Some(Self::Driver),
            "FLEET_OWNER" | "FLEETOWNER" => Some(Self::FleetOwner),
            _ => None,
        }
    }
}

impl std::fmt::Display for RegistrantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registrant attribute that may be absent from one backend shape.
///
/// Fleet-owner records lack some driver fields; normalization maps the
/// gap to an explicit sentinel so downstream rendering never branches
/// on record shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Present(String),
    NotApplicable,
}

impl FieldValue {
    pub const NA: &'static str = "N/A";

    /// Empty or whitespace-only backend values collapse to the sentinel.
    pub fn from_option(value: Option<String>) -> Self {
        match value {
            Some(value) if !value.trim().is_empty() => Self::Present(value),
            _ => Self::NotApplicable,
        }
    }

    pub fn as_display(&self) -> &str {
        match self {
            Self::Present(value) => value,
            Self::NotApplicable => Self::NA,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Enumerated ambulance service class, with the human labels the backend
/// uses as wire values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AmbulanceCategory {
    Mfr,
    Pts,
    Bls,
    Dba,
    Als,
}

impl AmbulanceCategory {
    pub const ALL: [AmbulanceCategory; 5] =
        [Self::Mfr, Self::Pts, Self::Bls, Self::Dba, Self::Als];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Mfr => "MFR",
            Self::Pts => "PTS",
            Self::Bls => "BLS",
            Self::Dba => "DBA",
            Self::Als => "ALS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mfr => "MFR - medical first responder",
            Self::Pts => "PTS - patient transport support",
            Self::Bls => "BLS - basic life support",
            Self::Dba => "DBA - dead body ambulance",
            Self::Als => "ALS - advance life support",
        }
    }

    /// Accepts either the short code or the full wire label.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let code = trimmed.split([' ', '-']).next().unwrap_or(trimmed);
        match code.to_ascii_uppercase().as_str() {
            "MFR" => Some(Self::Mfr),
            "PTS" => Some(Self::Pts),
            "BLS" => Some(Self::Bls),
            "DBA" => Some(Self::Dba),
            "ALS" => Some(Self::Als),
            _ => None,
        }
    }
}

impl std::fmt::Display for AmbulanceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Canonical registrant record, normalized from either backend shape.
///
/// An immutable snapshot of server truth for the page it was fetched
/// with; superseded only by a re-fetch, never mutated in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Registrant {
    pub id: RegistrantId,
    pub registration_id: FieldValue,
    pub registrant_type: RegistrantType,
    pub display_name: String,
    pub phone_number: FieldValue,
    pub email: FieldValue,
    pub address: FieldValue,
    pub ambulance_category: Option<AmbulanceCategory>,
    pub vehicle_number: FieldValue,
    pub is_email_verified: bool,
    pub is_phone_number_verified: bool,
    pub kyc_stage: FieldValue,
    pub submitted_at: Option<DateTime<Utc>>,
    pub last_updated_at: Option<DateTime<Utc>>,
    pub kyc: KycDocuments,
}

impl Registrant {
    /// Uniform display value for a verifiable field, for code that only
    /// needs the one-line cell text rather than the full sub-document.
    pub fn field_summary(&self, field: crate::domain::field::FieldKey) -> String {
        use crate::domain::field::FieldKey;

        match field {
            FieldKey::Email => self.email.as_display().to_owned(),
            FieldKey::Address => self.address.as_display().to_owned(),
            FieldKey::AmbulanceCategory => self
                .ambulance_category
                .map(|category| category.label().to_owned())
                .unwrap_or_else(|| FieldValue::NA.to_owned()),
            FieldKey::AadhaarDetails => summary_or_na(
                self.kyc.aadhaar_detail.as_ref().and_then(|d| d.aadhar_number.as_deref()),
            ),
            FieldKey::PanDetails => {
                summary_or_na(self.kyc.pan_detail.as_ref().and_then(|d| d.pan.as_deref()))
            }
            FieldKey::DlDetails => {
                summary_or_na(self.kyc.dl_detail.as_ref().and_then(|d| d.dl_number.as_deref()))
            }
            FieldKey::BankDetails => summary_or_na(
                self.kyc.bank_detail.as_ref().and_then(|d| d.name_at_bank.as_deref()),
            ),
            FieldKey::RcDetails => {
                summary_or_na(self.kyc.rc_detail.as_ref().and_then(|d| d.reg_no.as_deref()))
            }
        }
    }
}

fn summary_or_na(value: Option<&str>) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => value.to_owned(),
        _ => FieldValue::NA.to_owned(),
    }
}
