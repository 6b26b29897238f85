//! Read seam over the registrant backend collections.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::kyc::RcDetail;
use crate::domain::registrant::{Registrant, RegistrantType};
use crate::errors::FetchError;
use crate::pagination::PageQuery;

/// One fetched page of registrant records.
///
/// Zero records with `total_count == 0` is a valid success, distinct
/// from a fetch failure.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrantPage {
    pub records: Vec<Registrant>,
    pub total_pages: u32,
    pub total_count: u64,
}

/// Fetches registrant pages and per-registrant reads; always reflects
/// server truth for the requested page (no caching at this layer).
#[async_trait]
pub trait RegistrantDirectory: Send + Sync {
    async fn fetch_page(&self, query: &PageQuery) -> Result<RegistrantPage, FetchError>;

    /// Secondary lookup of registration-certificate details by the
    /// vehicle registration number.
    async fn rc_detail(
        &self,
        registrant_type: RegistrantType,
        reg_no: &str,
    ) -> Result<Option<RcDetail>, FetchError>;
}
