//! HTTP client layer for the verification backend.
//!
//! Implements the `kycdesk-core` trait seams over REST/JSON: registrant
//! page fetches, per-registrant approval status lookups, and approval
//! writes. All wire-shape normalization happens here; everything above
//! this crate sees only canonical records.

pub mod approvals;
pub mod client;
pub mod envelope;
pub mod registrants;

pub use approvals::HttpApprovalTransport;
pub use client::BackendClient;
pub use envelope::ApiEnvelope;
pub use registrants::HttpRegistrantDirectory;
