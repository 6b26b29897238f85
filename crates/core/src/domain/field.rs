use serde::{Deserialize, Serialize};

/// The fixed set of independently verifiable slots on a registrant.
///
/// Every slot carries its own approval status; the set is schema-defined
/// and never grows at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Email,
    Address,
    AmbulanceCategory,
    AadhaarDetails,
    PanDetails,
    DlDetails,
    BankDetails,
    RcDetails,
}

impl FieldKey {
    pub const ALL: [FieldKey; 8] = [
        Self::Email,
        Self::Address,
        Self::AmbulanceCategory,
        Self::AadhaarDetails,
        Self::PanDetails,
        Self::DlDetails,
        Self::BankDetails,
        Self::RcDetails,
    ];

    /// Wire name used by the generic approval endpoint and status sets.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Address => "address",
            Self::AmbulanceCategory => "ambulance_category",
            Self::AadhaarDetails => "aadhaar_details",
            Self::PanDetails => "pan_details",
            Self::DlDetails => "dl_details",
            Self::BankDetails => "bank_details",
            Self::RcDetails => "rc_details",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "email" => Some(Self::Email),
            "address" => Some(Self::Address),
            "ambulance_category" => Some(Self::AmbulanceCategory),
            "aadhaar_details" | "aadhar_details" => Some(Self::AadhaarDetails),
            "pan_details" => Some(Self::PanDetails),
            "dl_details" => Some(Self::DlDetails),
            "bank_details" => Some(Self::BankDetails),
            "rc_details" => Some(Self::RcDetails),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "Email ID",
            Self::Address => "Address",
            Self::AmbulanceCategory => "Ambulance Category",
            Self::AadhaarDetails => "Aadhaar Details",
            Self::PanDetails => "PAN Details",
            Self::DlDetails => "Driving License Details",
            Self::BankDetails => "Bank Account Details",
            Self::RcDetails => "Registration Certificate Details",
        }
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which backend path an approval submission for a field takes.
///
/// Aadhaar and driving-license identity records live behind dedicated
/// verification-toggle endpoints that take a boolean; every other field
/// goes through the generic per-field approval endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApprovalRoute {
    Generic,
    AadhaarToggle,
    DlToggle,
}

impl ApprovalRoute {
    /// Total over `FieldKey`: adding a field without deciding its route
    /// is a compile error, never a silent mis-dispatch.
    pub fn for_field(field: FieldKey) -> Self {
        match field {
            FieldKey::AadhaarDetails => Self::AadhaarToggle,
            FieldKey::DlDetails => Self::DlToggle,
            FieldKey::Email
            | FieldKey::Address
            | FieldKey::AmbulanceCategory
            | FieldKey::PanDetails
            | FieldKey::BankDetails
            | FieldKey::RcDetails => Self::Generic,
        }
    }
}
