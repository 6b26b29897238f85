//! Per-registrant approval status cache for the visible page.
//!
//! One concurrent lookup per registrant id, all-settled: a failed
//! lookup leaves that id absent (all fields pending) instead of failing
//! the batch. Page sizes are small, so the only consistency mechanism
//! after a successful approval is a full batch reload.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::approvals::ApprovalStatus;
use crate::domain::field::FieldKey;
use crate::domain::registrant::RegistrantId;
use crate::errors::FetchError;

/// Latest known approval status per field for one registrant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStatusSet {
    statuses: HashMap<FieldKey, ApprovalStatus>,
}

impl FieldStatusSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, field: FieldKey, status: ApprovalStatus) -> Self {
        self.statuses.insert(field, status);
        self
    }

    pub fn set(&mut self, field: FieldKey, status: ApprovalStatus) {
        self.statuses.insert(field, status);
    }

    pub fn get(&self, field: FieldKey) -> ApprovalStatus {
        self.statuses.get(&field).cloned().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

/// Read seam for per-registrant status lookups.
#[async_trait]
pub trait ApprovalStatusSource: Send + Sync {
    async fn statuses_for(&self, registrant_id: &RegistrantId)
        -> Result<FieldStatusSet, FetchError>;
}

#[derive(Clone, Debug, Default)]
pub struct StatusCache {
    entries: HashMap<RegistrantId, FieldStatusSet>,
}

impl StatusCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache with fresh statuses for the given page of ids.
    ///
    /// Lookups run concurrently; ids whose lookup fails are simply
    /// absent afterwards and report pending for every field.
    pub async fn load<S>(&mut self, registrant_ids: &[RegistrantId], source: &S)
    where
        S: ApprovalStatusSource,
    {
        let lookups = registrant_ids
            .iter()
            .map(|id| async move { (id.clone(), source.statuses_for(id).await) });
        let results = join_all(lookups).await;

        self.entries.clear();
        for (registrant_id, result) in results {
            match result {
                Ok(statuses) => {
                    self.entries.insert(registrant_id, statuses);
                }
                Err(error) => {
                    tracing::warn!(
                        registrant_id = %registrant_id,
                        error = %error,
                        "status lookup failed; fields degrade to pending"
                    );
                }
            }
        }
    }

    /// Pending is the universal default for unknown registrants or
    /// unrecorded fields.
    pub fn status(&self, registrant_id: &RegistrantId, field: FieldKey) -> ApprovalStatus {
        self.entries
            .get(registrant_id)
            .map(|statuses| statuses.get(field))
            .unwrap_or_default()
    }

    pub fn invalidate(&mut self, registrant_id: &RegistrantId) {
        self.entries.remove(registrant_id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{ApprovalStatusSource, FieldStatusSet, StatusCache};
    use crate::approvals::{ApprovalState, ApprovalStatus};
    use crate::domain::field::FieldKey;
    use crate::domain::registrant::RegistrantId;
    use crate::errors::FetchError;

    #[derive(Default)]
    struct FakeStatusSource {
        sets: HashMap<String, FieldStatusSet>,
        failing: Vec<String>,
        lookups: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ApprovalStatusSource for FakeStatusSource {
        async fn statuses_for(
            &self,
            registrant_id: &RegistrantId,
        ) -> Result<FieldStatusSet, FetchError> {
            self.lookups.lock().unwrap().push(registrant_id.0.clone());
            if self.failing.contains(&registrant_id.0) {
                return Err(FetchError::Transport("timeout".to_owned()));
            }
            Ok(self.sets.get(&registrant_id.0).cloned().unwrap_or_default())
        }
    }

    fn id(raw: &str) -> RegistrantId {
        RegistrantId(raw.to_owned())
    }

    #[tokio::test]
    async fn loads_one_lookup_per_registrant() {
        let mut source = FakeStatusSource::default();
        source.sets.insert(
            "drv-1".to_owned(),
            FieldStatusSet::new().with_status(FieldKey::Email, ApprovalStatus::accepted()),
        );
        let mut cache = StatusCache::new();

        cache.load(&[id("drv-1"), id("drv-2")], &source).await;

        let mut lookups = source.lookups.lock().unwrap().clone();
        lookups.sort();
        assert_eq!(lookups, vec!["drv-1".to_owned(), "drv-2".to_owned()]);
        assert_eq!(cache.status(&id("drv-1"), FieldKey::Email).state, ApprovalState::Accepted);
    }

    #[tokio::test]
    async fn partial_failure_degrades_to_pending_without_failing_the_batch() {
        let mut source = FakeStatusSource::default();
        source.sets.insert(
            "drv-1".to_owned(),
            FieldStatusSet::new()
                .with_status(FieldKey::PanDetails, ApprovalStatus::declined("name mismatch")),
        );
        source.failing.push("drv-2".to_owned());
        let mut cache = StatusCache::new();

        cache.load(&[id("drv-1"), id("drv-2")], &source).await;

        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.status(&id("drv-1"), FieldKey::PanDetails),
            ApprovalStatus::declined("name mismatch")
        );
        for field in FieldKey::ALL {
            assert_eq!(cache.status(&id("drv-2"), field), ApprovalStatus::pending());
        }
    }

    #[tokio::test]
    async fn unknown_registrant_reports_pending_for_every_field() {
        let cache = StatusCache::new();
        for field in FieldKey::ALL {
            assert_eq!(cache.status(&id("ghost"), field).state, ApprovalState::Pending);
        }
    }

    #[tokio::test]
    async fn reload_replaces_previous_page_entries() {
        let mut source = FakeStatusSource::default();
        source.sets.insert(
            "drv-1".to_owned(),
            FieldStatusSet::new().with_status(FieldKey::Email, ApprovalStatus::accepted()),
        );
        let mut cache = StatusCache::new();

        cache.load(&[id("drv-1")], &source).await;
        assert_eq!(cache.status(&id("drv-1"), FieldKey::Email).state, ApprovalState::Accepted);

        cache.load(&[id("drv-9")], &source).await;
        assert_eq!(cache.status(&id("drv-1"), FieldKey::Email).state, ApprovalState::Pending);
    }

    #[test]
    fn unrecorded_field_in_a_known_set_is_pending() {
        let set = FieldStatusSet::new().with_status(FieldKey::Email, ApprovalStatus::accepted());
        assert_eq!(set.get(FieldKey::BankDetails), ApprovalStatus::pending());
    }
}
