//! Registrant repository over the two backend collections.
//!
//! Driver and fleet-owner responses differ in shape: drivers come from
//! a server-paginated listing, fleet owners from an unpaginated `all`
//! endpoint that is filtered and paginated in memory. Both shapes are
//! normalized into the canonical [`Registrant`] here, at the boundary,
//! so nothing downstream branches on record shape.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::HashMap;

use kycdesk_core::domain::kyc::{KycDocuments, RcDetail};
use kycdesk_core::{
    ApprovalState, ApprovalStatus, ApprovalStatusSource, FetchError, FieldKey, FieldStatusSet,
    FieldValue, PageQuery, Registrant, RegistrantDirectory, RegistrantId, RegistrantPage,
    RegistrantType,
};
use kycdesk_core::domain::registrant::AmbulanceCategory;

use crate::client::BackendClient;
use crate::envelope::ApiEnvelope;

const DATE_WIRE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug)]
pub struct HttpRegistrantDirectory {
    client: BackendClient,
}

impl HttpRegistrantDirectory {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    async fn fetch_driver_page(&self, query: &PageQuery) -> Result<RegistrantPage, FetchError> {
        let mut params: Vec<(&str, String)> = vec![
            ("page", query.page.to_string()),
            ("limit", query.page_size.to_string()),
        ];
        if let Some(search) = &query.search_term {
            params.push(("search", search.clone()));
        }
        if let Some(date) = query.date {
            params.push(("date", date.format(DATE_WIRE_FORMAT).to_string()));
        }

        let response: DriverListResponse = self
            .client
            .get_raw("/driver/getDrivers", &params, "fetch drivers")
            .await?;

        if !response.success {
            return Err(FetchError::Api(
                response.message.unwrap_or_else(|| "fetch drivers failed".to_owned()),
            ));
        }

        let records = response
            .data
            .unwrap_or_default()
            .into_iter()
            .map(normalize_driver)
            .collect::<Vec<_>>();
        let pagination = response.pagination.unwrap_or_default();

        Ok(RegistrantPage {
            total_pages: pagination.total_pages.max(1),
            total_count: pagination.total_drivers.unwrap_or(records.len() as u64),
            records,
        })
    }

    async fn fetch_fleet_owner_page(&self, query: &PageQuery) -> Result<RegistrantPage, FetchError> {
        let envelope: ApiEnvelope<Vec<FleetOwnerWire>> = self
            .client
            .get_envelope("/api/fleetOwner/all", &[], "fetch fleet owners")
            .await?;
        let records = envelope
            .into_data("fetch fleet owners")?
            .unwrap_or_default()
            .into_iter()
            .map(normalize_fleet_owner)
            .collect::<Vec<_>>();

        Ok(filter_and_page_in_memory(records, query))
    }
}

#[async_trait]
impl RegistrantDirectory for HttpRegistrantDirectory {
    async fn fetch_page(&self, query: &PageQuery) -> Result<RegistrantPage, FetchError> {
        let page = match query.registrant_type {
            RegistrantType::Driver => self.fetch_driver_page(query).await?,
            RegistrantType::FleetOwner => self.fetch_fleet_owner_page(query).await?,
        };
        tracing::debug!(
            registrant_type = %query.registrant_type,
            page = query.page,
            records = page.records.len(),
            total_pages = page.total_pages,
            "registrant page fetched"
        );
        Ok(page)
    }

    async fn rc_detail(
        &self,
        registrant_type: RegistrantType,
        reg_no: &str,
    ) -> Result<Option<RcDetail>, FetchError> {
        let path = match registrant_type {
            RegistrantType::FleetOwner => "/api/fleetOwner/ambulance-rc/",
            RegistrantType::Driver => "/api/driver/ambulance-rc/",
        };
        let envelope: ApiEnvelope<RcDetail> = self
            .client
            .get_envelope(path, &[("reg_no", reg_no.to_owned())], "fetch rc detail")
            .await?;
        envelope.into_data("fetch rc detail")
    }
}

#[async_trait]
impl ApprovalStatusSource for HttpRegistrantDirectory {
    async fn statuses_for(
        &self,
        registrant_id: &RegistrantId,
    ) -> Result<FieldStatusSet, FetchError> {
        let path = format!("/driver/approval/{registrant_id}");
        let envelope: ApiEnvelope<HashMap<String, StatusWire>> = self
            .client
            .get_envelope(&path, &[], "fetch approval statuses")
            .await?;
        let raw = envelope.into_data("fetch approval statuses")?.unwrap_or_default();
        Ok(parse_status_set(raw))
    }
}

// Wire shapes.

#[derive(Debug, Default, Deserialize)]
struct DriverListResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Vec<DriverWire>>,
    #[serde(default)]
    pagination: Option<PaginationWire>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaginationWire {
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_drivers: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DriverWire {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    #[serde(default)]
    driver_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    ambulance_category: Option<String>,
    #[serde(default)]
    vehicle_number: Option<String>,
    #[serde(default)]
    is_email_verified: bool,
    #[serde(default)]
    is_phone_number_verified: bool,
    #[serde(default)]
    kyc_stage: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    kyc_details: Option<KycDocuments>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FleetOwnerWire {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    #[serde(default)]
    owner_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    vehicle_number: Option<String>,
    #[serde(default)]
    ambulance_type: Option<String>,
    #[serde(default)]
    is_phone_number_verified: bool,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    kyc_details: Option<KycDocuments>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusWire {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    remark: Option<String>,
}

// Normalization.

pub(crate) fn normalize_driver(wire: DriverWire) -> Registrant {
    Registrant {
        id: RegistrantId(wire.id),
        registration_id: FieldValue::from_option(wire.driver_id),
        registrant_type: RegistrantType::Driver,
        display_name: wire.name.unwrap_or_default(),
        phone_number: FieldValue::from_option(wire.phone_number),
        email: FieldValue::from_option(wire.email),
        address: FieldValue::from_option(wire.address),
        ambulance_category: wire
            .ambulance_category
            .as_deref()
            .and_then(AmbulanceCategory::parse),
        vehicle_number: FieldValue::from_option(wire.vehicle_number),
        is_email_verified: wire.is_email_verified,
        is_phone_number_verified: wire.is_phone_number_verified,
        kyc_stage: FieldValue::from_option(wire.kyc_stage),
        submitted_at: wire.created_at,
        last_updated_at: wire.updated_at,
        kyc: wire.kyc_details.unwrap_or_default(),
    }
}

/// Fleet-owner records lack some driver fields (email, ambulance
/// category); the gaps become explicit sentinels instead of holes.
pub(crate) fn normalize_fleet_owner(wire: FleetOwnerWire) -> Registrant {
    Registrant {
        id: RegistrantId(wire.id),
        registration_id: FieldValue::from_option(wire.owner_id),
        registrant_type: RegistrantType::FleetOwner,
        display_name: wire.name.unwrap_or_default(),
        phone_number: FieldValue::from_option(wire.phone_number),
        email: FieldValue::NotApplicable,
        address: FieldValue::from_option(wire.address),
        ambulance_category: wire.ambulance_type.as_deref().and_then(AmbulanceCategory::parse),
        vehicle_number: FieldValue::from_option(wire.vehicle_number),
        is_email_verified: false,
        is_phone_number_verified: wire.is_phone_number_verified,
        kyc_stage: FieldValue::from_option(wire.status),
        submitted_at: wire.created_at,
        last_updated_at: wire.updated_at,
        kyc: wire.kyc_details.unwrap_or_default(),
    }
}

fn matches_search(registrant: &Registrant, needle: &str) -> bool {
    let needle = needle.to_ascii_lowercase();
    let haystacks = [
        registrant.display_name.as_str(),
        registrant.id.as_str(),
        registrant.registration_id.as_display(),
        registrant.vehicle_number.as_display(),
    ];
    haystacks
        .iter()
        .any(|haystack| haystack.to_ascii_lowercase().contains(&needle))
}

fn matches_date(registrant: &Registrant, date: NaiveDate) -> bool {
    registrant
        .submitted_at
        .map(|submitted| submitted.date_naive() == date)
        .unwrap_or(false)
}

/// Client-side filter and pagination for the unpaginated fleet-owner
/// collection. Mirrors the server contract: `total_pages` is at least 1
/// and an out-of-range page yields an empty record list.
pub(crate) fn filter_and_page_in_memory(
    records: Vec<Registrant>,
    query: &PageQuery,
) -> RegistrantPage {
    let filtered: Vec<Registrant> = records
        .into_iter()
        .filter(|registrant| {
            query
                .search_term
                .as_deref()
                .map_or(true, |needle| matches_search(registrant, needle))
        })
        .filter(|registrant| query.date.map_or(true, |date| matches_date(registrant, date)))
        .collect();

    let total_count = filtered.len() as u64;
    let page_size = query.page_size.max(1) as usize;
    let total_pages = (filtered.len().div_ceil(page_size)).max(1) as u32;
    let start = (query.page.max(1) as usize - 1) * page_size;
    let records = filtered.into_iter().skip(start).take(page_size).collect();

    RegistrantPage { records, total_pages, total_count }
}

pub(crate) fn parse_status_set(raw: HashMap<String, StatusWire>) -> FieldStatusSet {
    let mut set = FieldStatusSet::new();
    for (key, wire) in raw {
        let Some(field) = FieldKey::parse(&key) else {
            tracing::debug!(field = %key, "ignoring unknown field in status set");
            continue;
        };
        let state = wire
            .status
            .as_deref()
            .and_then(ApprovalState::parse)
            .unwrap_or(ApprovalState::Pending);
        set.set(field, ApprovalStatus { state, remark: wire.remark });
    }
    set
}
