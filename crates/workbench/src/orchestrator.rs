//! The workbench orchestrator: one instance per open view.
//!
//! Composes the registrant directory, the approval status cache, and
//! the approval dispatcher behind a small state machine:
//! `IDLE -> LOADING -> {READY, ERROR}`, with every state able to
//! re-enter `LOADING`. Fetches are generation-tagged so a response that
//! lands after a newer filter change is discarded instead of
//! overwriting fresher state.

use uuid::Uuid;

use kycdesk_core::{
    AmbulanceCategory, ApprovalDispatcher, ApprovalError, ApprovalStatus, ApprovalStatusSource,
    ApprovalSubmission, ApprovalTransport, FetchError, FieldDetailPayload, FieldKey, PageQuery,
    PageState, Registrant, RegistrantDirectory, RegistrantId, RegistrantPage, RegistrantType,
    StatusCache,
};

use crate::details;
use crate::rows::RegistrantRow;

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState {
    Idle,
    Loading,
    Ready,
    Error(String),
}

/// Tags one in-flight fetch with the generation it was started under.
#[derive(Clone, Debug)]
pub struct FetchTicket {
    generation: u64,
    correlation_id: Uuid,
    pub query: PageQuery,
}

/// Everything a completed fetch produced, applied atomically.
pub type FetchOutcome = Result<(RegistrantPage, StatusCache), FetchError>;

pub struct Workbench<D, T> {
    directory: D,
    dispatcher: ApprovalDispatcher<T>,
    page_state: PageState,
    state: ViewState,
    cache: StatusCache,
    page: RegistrantPage,
    rows: Vec<RegistrantRow>,
    generation: u64,
}

impl<D, T> Workbench<D, T>
where
    D: RegistrantDirectory + ApprovalStatusSource,
    T: ApprovalTransport,
{
    pub fn new(directory: D, transport: T, page_state: PageState) -> Self {
        Self {
            directory,
            dispatcher: ApprovalDispatcher::new(transport),
            page_state,
            state: ViewState::Idle,
            cache: StatusCache::new(),
            page: RegistrantPage::default(),
            rows: Vec::new(),
            generation: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn page_state(&self) -> &PageState {
        &self.page_state
    }

    pub fn rows(&self) -> &[RegistrantRow] {
        &self.rows
    }

    pub fn status(&self, registrant_id: &RegistrantId, field: FieldKey) -> ApprovalStatus {
        self.cache.status(registrant_id, field)
    }

    pub fn registrant(&self, registrant_id: &RegistrantId) -> Option<&Registrant> {
        self.page.records.iter().find(|record| &record.id == registrant_id)
    }

    /// Start a fetch under the current generation.
    ///
    /// The generation advances here, so any ticket issued earlier is
    /// already stale by the time this one is applied.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = ViewState::Loading;
        let ticket = FetchTicket {
            generation: self.generation,
            correlation_id: Uuid::new_v4(),
            query: PageQuery::from(&self.page_state),
        };
        tracing::debug!(
            correlation_id = %ticket.correlation_id,
            registrant_type = %ticket.query.registrant_type,
            page = ticket.query.page,
            "fetch started"
        );
        ticket
    }

    /// Run the repository fetch plus the status batch load for one
    /// ticket. Does not touch view state; pair with
    /// [`apply_fetch`](Self::apply_fetch).
    pub async fn run_fetch(&self, ticket: &FetchTicket) -> FetchOutcome {
        let page = self.directory.fetch_page(&ticket.query).await?;
        let ids: Vec<RegistrantId> = page.records.iter().map(|record| record.id.clone()).collect();
        let mut cache = StatusCache::new();
        cache.load(&ids, &self.directory).await;
        Ok((page, cache))
    }

    /// Apply a completed fetch, unless a newer one has started since.
    pub fn apply_fetch(&mut self, ticket: FetchTicket, outcome: FetchOutcome) {
        if ticket.generation != self.generation {
            tracing::debug!(
                correlation_id = %ticket.correlation_id,
                "discarding stale fetch result"
            );
            return;
        }

        match outcome {
            Ok((page, cache)) => {
                self.page_state.record_total_pages(page.total_pages);
                self.rows = page
                    .records
                    .iter()
                    .map(|record| RegistrantRow::build(record, &cache))
                    .collect();
                self.page = page;
                self.cache = cache;
                self.state = ViewState::Ready;
            }
            Err(error) => {
                tracing::warn!(
                    correlation_id = %ticket.correlation_id,
                    error = %error,
                    "fetch failed"
                );
                self.state = ViewState::Error(error.display_message());
            }
        }
    }

    pub async fn refresh(&mut self) {
        let ticket = self.begin_fetch();
        let outcome = self.run_fetch(&ticket).await;
        self.apply_fetch(ticket, outcome);
    }

    /// Manual retry out of the error state.
    pub async fn retry(&mut self) {
        self.refresh().await;
    }

    /// No-op outside the valid page range; otherwise fetches the page.
    pub async fn set_page(&mut self, page: u32) {
        if self.page_state.set_page(page) {
            self.refresh().await;
        }
    }

    pub async fn set_search_term(&mut self, search_term: Option<String>) {
        self.page_state.set_search_term(search_term);
        self.refresh().await;
    }

    pub async fn set_selected_date(&mut self, selected_date: Option<chrono::NaiveDate>) {
        self.page_state.set_selected_date(selected_date);
        self.refresh().await;
    }

    pub async fn set_page_size(&mut self, page_size: u32) {
        self.page_state.set_page_size(page_size);
        self.refresh().await;
    }

    pub async fn set_registrant_type(&mut self, registrant_type: RegistrantType) {
        self.page_state.set_registrant_type(registrant_type);
        self.refresh().await;
    }

    /// Submit a field approval; on success the status cache entry is
    /// invalidated and the visible page re-fetched so the row reflects
    /// the new status immediately.
    pub async fn submit_approval(
        &mut self,
        submission: &ApprovalSubmission,
    ) -> Result<(), ApprovalError> {
        self.dispatcher.submit(submission).await?;
        self.cache.invalidate(&submission.registrant_id);
        self.refresh().await;
        Ok(())
    }

    pub async fn update_ambulance_category(
        &mut self,
        vehicle_id: &str,
        category: Option<AmbulanceCategory>,
    ) -> Result<(), ApprovalError> {
        self.dispatcher.update_ambulance_category(vehicle_id, category).await?;
        self.refresh().await;
        Ok(())
    }

    pub async fn update_address(
        &mut self,
        registrant_id: &RegistrantId,
        address: &str,
    ) -> Result<(), ApprovalError> {
        self.dispatcher.update_address(registrant_id, address).await?;
        self.refresh().await;
        Ok(())
    }

    /// Resolve the detail payload for an opened field. The payload is
    /// transient: owned by the caller, independent of the table state.
    pub async fn open_field(
        &self,
        registrant_id: &RegistrantId,
        field: FieldKey,
    ) -> Option<FieldDetailPayload> {
        let registrant = self.registrant(registrant_id)?;
        Some(details::resolve(&self.directory, registrant, field).await)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use kycdesk_core::approvals::cache::FieldStatusSet;
    use kycdesk_core::domain::kyc::{KycDocuments, RcDetail};
    use kycdesk_core::{
        AmbulanceCategory, ApprovalState, ApprovalStatus, ApprovalStatusSource,
        ApprovalSubmission, ApprovalTransport, FetchError, FieldKey, FieldValue, PageQuery,
        PageState, Registrant, RegistrantDirectory, RegistrantId, RegistrantPage, RegistrantType,
    };

    use super::{ViewState, Workbench};

    /// One in-memory backend shared by the directory, status source,
    /// and transport handles, so approvals written through the
    /// transport are visible on the next status reload.
    #[derive(Default)]
    struct Backend {
        records: Mutex<Vec<Registrant>>,
        statuses: Mutex<HashMap<String, FieldStatusSet>>,
        queries: Mutex<Vec<PageQuery>>,
        fail_fetch: Mutex<Option<FetchError>>,
    }

    #[derive(Clone, Default)]
    struct Handle(Arc<Backend>);

    impl Handle {
        fn seed_records(&self, count: usize) {
            let records = (1..=count).map(|n| registrant(&format!("drv-{n}"))).collect();
            *self.0.records.lock().unwrap() = records;
        }

        fn fail_fetches_with(&self, error: Option<FetchError>) {
            *self.0.fail_fetch.lock().unwrap() = error;
        }

        fn recorded_queries(&self) -> Vec<PageQuery> {
            self.0.queries.lock().unwrap().clone()
        }

        fn set_status(&self, raw_id: &str, field: FieldKey, status: ApprovalStatus) {
            self.0
                .statuses
                .lock()
                .unwrap()
                .entry(raw_id.to_owned())
                .or_default()
                .set(field, status);
        }
    }

    #[async_trait]
    impl RegistrantDirectory for Handle {
        async fn fetch_page(&self, query: &PageQuery) -> Result<RegistrantPage, FetchError> {
            self.0.queries.lock().unwrap().push(query.clone());
            if let Some(error) = self.0.fail_fetch.lock().unwrap().clone() {
                return Err(error);
            }

            let records = self.0.records.lock().unwrap().clone();
            let total_count = records.len() as u64;
            let total_pages = ((records.len() as u32).div_ceil(query.page_size)).max(1);
            let start = ((query.page - 1) * query.page_size) as usize;
            let page: Vec<Registrant> = records
                .into_iter()
                .skip(start)
                .take(query.page_size as usize)
                .collect();
            Ok(RegistrantPage { records: page, total_pages, total_count })
        }

        async fn rc_detail(
            &self,
            _registrant_type: RegistrantType,
            _reg_no: &str,
        ) -> Result<Option<RcDetail>, FetchError> {
            Ok(None)
        }
    }

    #[async_trait]
    impl ApprovalStatusSource for Handle {
        async fn statuses_for(
            &self,
            registrant_id: &RegistrantId,
        ) -> Result<FieldStatusSet, FetchError> {
            Ok(self.0.statuses.lock().unwrap().get(&registrant_id.0).cloned().unwrap_or_default())
        }
    }

    #[async_trait]
    impl ApprovalTransport for Handle {
        async fn post_field_approval(
            &self,
            registrant_id: &RegistrantId,
            field: FieldKey,
            state: ApprovalState,
            remark: Option<&str>,
        ) -> Result<(), FetchError> {
            self.set_status(
                &registrant_id.0,
                field,
                ApprovalStatus { state, remark: remark.map(str::to_owned) },
            );
            Ok(())
        }

        async fn set_aadhaar_verified(
            &self,
            registrant_id: &RegistrantId,
            is_verified: bool,
        ) -> Result<(), FetchError> {
            let status =
                if is_verified { ApprovalStatus::accepted() } else { ApprovalStatus::pending() };
            self.set_status(&registrant_id.0, FieldKey::AadhaarDetails, status);
            Ok(())
        }

        async fn set_dl_verified(
            &self,
            registrant_id: &RegistrantId,
            is_verified: bool,
        ) -> Result<(), FetchError> {
            let status =
                if is_verified { ApprovalStatus::accepted() } else { ApprovalStatus::pending() };
            self.set_status(&registrant_id.0, FieldKey::DlDetails, status);
            Ok(())
        }

        async fn put_ambulance_category(
            &self,
            _vehicle_id: &str,
            _category: AmbulanceCategory,
        ) -> Result<(), FetchError> {
            Ok(())
        }

        async fn put_address(
            &self,
            _registrant_id: &RegistrantId,
            _address: &str,
        ) -> Result<(), FetchError> {
            Ok(())
        }
    }

    fn registrant(raw_id: &str) -> Registrant {
        Registrant {
            id: RegistrantId(raw_id.to_owned()),
            registration_id: FieldValue::from_option(Some(format!("AMB-{raw_id}"))),
            registrant_type: RegistrantType::Driver,
            display_name: format!("Driver {raw_id}"),
            phone_number: FieldValue::from_option(Some("9876500000".to_owned())),
            email: FieldValue::from_option(Some(format!("{raw_id}@ambuvians.example"))),
            address: FieldValue::NotApplicable,
            ambulance_category: Some(AmbulanceCategory::Bls),
            vehicle_number: FieldValue::from_option(Some("UP32AB1234".to_owned())),
            is_email_verified: false,
            is_phone_number_verified: true,
            kyc_stage: FieldValue::NotApplicable,
            submitted_at: None,
            last_updated_at: None,
            kyc: KycDocuments::default(),
        }
    }

    fn workbench(handle: &Handle) -> Workbench<Handle, Handle> {
        Workbench::new(handle.clone(), handle.clone(), PageState::new(RegistrantType::Driver))
    }

    #[tokio::test]
    async fn refresh_moves_idle_through_loading_to_ready() {
        let handle = Handle::default();
        handle.seed_records(25);
        handle.set_status("drv-1", FieldKey::Email, ApprovalStatus::accepted());
        let mut workbench = workbench(&handle);
        assert_eq!(*workbench.state(), ViewState::Idle);

        workbench.refresh().await;

        assert_eq!(*workbench.state(), ViewState::Ready);
        assert_eq!(workbench.rows().len(), 12);
        assert_eq!(workbench.page_state().total_pages, 3);
        assert_eq!(
            workbench.status(&RegistrantId("drv-1".to_owned()), FieldKey::Email),
            ApprovalStatus::accepted()
        );
    }

    #[tokio::test]
    async fn set_page_beyond_total_pages_issues_no_fetch() {
        let handle = Handle::default();
        handle.seed_records(25);
        let mut workbench = workbench(&handle);
        workbench.refresh().await;
        let fetches_before = handle.recorded_queries().len();

        workbench.set_page(4).await;

        assert_eq!(handle.recorded_queries().len(), fetches_before);
        assert_eq!(workbench.page_state().current_page, 1);
    }

    #[tokio::test]
    async fn type_switch_resets_to_page_one_before_the_fetch() {
        let handle = Handle::default();
        handle.seed_records(25);
        let mut workbench = workbench(&handle);
        workbench.refresh().await;
        workbench.set_page(2).await;
        assert_eq!(workbench.page_state().current_page, 2);

        workbench.set_registrant_type(RegistrantType::FleetOwner).await;

        let last = handle.recorded_queries().pop().unwrap();
        assert_eq!(last.registrant_type, RegistrantType::FleetOwner);
        assert_eq!(last.page, 1);
    }

    #[tokio::test]
    async fn fetch_failure_enters_error_and_retry_recovers() {
        let handle = Handle::default();
        handle.seed_records(3);
        handle.fail_fetches_with(Some(FetchError::Transport("connection refused".to_owned())));
        let mut workbench = workbench(&handle);

        workbench.refresh().await;
        match workbench.state() {
            ViewState::Error(message) => assert!(message.contains("connection refused")),
            other => panic!("expected error state, got {other:?}"),
        }

        handle.fail_fetches_with(None);
        workbench.retry().await;
        assert_eq!(*workbench.state(), ViewState::Ready);
        assert_eq!(workbench.rows().len(), 3);
    }

    #[tokio::test]
    async fn stale_fetch_results_are_discarded() {
        let handle = Handle::default();
        handle.seed_records(1);
        let mut workbench = workbench(&handle);

        let stale = workbench.begin_fetch();
        let stale_outcome = workbench.run_fetch(&stale).await;

        handle.seed_records(2);
        let fresh = workbench.begin_fetch();
        let fresh_outcome = workbench.run_fetch(&fresh).await;
        workbench.apply_fetch(fresh, fresh_outcome);
        assert_eq!(workbench.rows().len(), 2);

        workbench.apply_fetch(stale, stale_outcome);
        assert_eq!(workbench.rows().len(), 2);
        assert_eq!(*workbench.state(), ViewState::Ready);
    }

    #[tokio::test]
    async fn stale_failure_does_not_disturb_a_ready_view() {
        let handle = Handle::default();
        handle.seed_records(2);
        let mut workbench = workbench(&handle);

        let stale = workbench.begin_fetch();
        let fresh = workbench.begin_fetch();
        let fresh_outcome = workbench.run_fetch(&fresh).await;
        workbench.apply_fetch(fresh, fresh_outcome);

        workbench.apply_fetch(stale, Err(FetchError::Transport("timeout".to_owned())));
        assert_eq!(*workbench.state(), ViewState::Ready);
    }

    #[tokio::test]
    async fn successful_approval_becomes_visible_after_the_reload() {
        let handle = Handle::default();
        handle.seed_records(2);
        let mut workbench = workbench(&handle);
        workbench.refresh().await;

        let registrant_id = RegistrantId("drv-2".to_owned());
        workbench
            .submit_approval(&ApprovalSubmission {
                registrant_id: registrant_id.clone(),
                field: FieldKey::BankDetails,
                state: ApprovalState::Declined,
                remark: Some("IFSC mismatch".to_owned()),
            })
            .await
            .expect("decline with remark should submit");

        assert_eq!(
            workbench.status(&registrant_id, FieldKey::BankDetails),
            ApprovalStatus::declined("IFSC mismatch")
        );
        let row = workbench
            .rows()
            .iter()
            .find(|row| row.registrant.id == registrant_id)
            .expect("row for drv-2");
        assert_eq!(row.cell(FieldKey::BankDetails).status.state, ApprovalState::Declined);
    }

    #[tokio::test]
    async fn open_field_resolves_against_the_current_page() {
        let handle = Handle::default();
        handle.seed_records(1);
        let mut workbench = workbench(&handle);
        workbench.refresh().await;

        let payload = workbench
            .open_field(&RegistrantId("drv-1".to_owned()), FieldKey::Email)
            .await
            .expect("registrant on the current page");
        assert_eq!(payload.field_label(), "Email ID");

        let missing = workbench.open_field(&RegistrantId("ghost".to_owned()), FieldKey::Email).await;
        assert!(missing.is_none());
    }
}
