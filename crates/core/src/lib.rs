pub mod approvals;
pub mod config;
pub mod directory;
pub mod domain;
pub mod errors;
pub mod pagination;

pub use approvals::cache::{ApprovalStatusSource, FieldStatusSet, StatusCache};
pub use approvals::{
    ApprovalDispatcher, ApprovalState, ApprovalStatus, ApprovalSubmission, ApprovalTransport,
};
pub use directory::{RegistrantDirectory, RegistrantPage};
pub use domain::field::{ApprovalRoute, FieldKey};
pub use domain::kyc::{
    AadhaarDetail, BankDetail, DlDetail, FieldDetailPayload, KycDocuments, PanDetail, RcDetail,
};
pub use domain::registrant::{
    AmbulanceCategory, FieldValue, Registrant, RegistrantId, RegistrantType,
};
pub use errors::{ApprovalError, FetchError, ValidationError};
pub use pagination::{PageQuery, PageState, DEFAULT_PAGE_SIZE};
