//! Page and filter state for one open workbench view.
//!
//! The state is an explicit value threaded through the orchestrator's
//! operations. Any filter mutation resets the current page to 1 before
//! the next fetch, so the operator never lands on an out-of-range page
//! after narrowing the result set.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::registrant::RegistrantType;

pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Maximum number of page buttons the presentation layer shows at once.
const VISIBLE_PAGE_BUTTONS: u32 = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub current_page: u32,
    pub total_pages: u32,
    pub page_size: u32,
    pub search_term: Option<String>,
    pub selected_date: Option<NaiveDate>,
    pub registrant_type: RegistrantType,
}

impl PageState {
    pub fn new(registrant_type: RegistrantType) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search_term: None,
            selected_date: None,
            registrant_type,
        }
    }

    /// No-op outside `[1, total_pages]`. Returns whether the page moved.
    pub fn set_page(&mut self, page: u32) -> bool {
        if page < 1 || page > self.total_pages || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn set_search_term(&mut self, search_term: Option<String>) {
        self.search_term = search_term.filter(|term| !term.trim().is_empty());
        self.on_filter_changed();
    }

    pub fn set_selected_date(&mut self, selected_date: Option<NaiveDate>) {
        self.selected_date = selected_date;
        self.on_filter_changed();
    }

    /// Ignores a zero size; the backend contract requires `pageSize >= 1`.
    pub fn set_page_size(&mut self, page_size: u32) {
        if page_size < 1 {
            return;
        }
        self.page_size = page_size;
        self.on_filter_changed();
    }

    pub fn set_registrant_type(&mut self, registrant_type: RegistrantType) {
        self.registrant_type = registrant_type;
        self.on_filter_changed();
    }

    /// Unconditional reset to page 1, applied before any fetch for the
    /// new filter executes.
    pub fn on_filter_changed(&mut self) {
        self.current_page = 1;
    }

    /// Record totals reported by a completed fetch.
    pub fn record_total_pages(&mut self, total_pages: u32) {
        self.total_pages = total_pages.max(1);
        if self.current_page > self.total_pages {
            self.current_page = self.total_pages;
        }
    }

    /// Sliding window of at most ten visible page numbers centered on
    /// the current page, clamped to `[1, total_pages]`.
    pub fn visible_pages(&self) -> Vec<u32> {
        let mut start = self.current_page.saturating_sub(VISIBLE_PAGE_BUTTONS / 2).max(1);
        let end = self.total_pages.min(start + VISIBLE_PAGE_BUTTONS - 1);
        if end.saturating_sub(start) < VISIBLE_PAGE_BUTTONS - 1 {
            start = end.saturating_sub(VISIBLE_PAGE_BUTTONS - 1).max(1);
        }
        (start..=end).collect()
    }

    pub fn has_prev_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// One fetch request derived from the page state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub registrant_type: RegistrantType,
    pub page: u32,
    pub page_size: u32,
    pub search_term: Option<String>,
    pub date: Option<NaiveDate>,
}

impl From<&PageState> for PageQuery {
    fn from(state: &PageState) -> Self {
        Self {
            registrant_type: state.registrant_type,
            page: state.current_page,
            page_size: state.page_size,
            search_term: state.search_term.clone(),
            date: state.selected_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{PageQuery, PageState};
    use crate::domain::registrant::RegistrantType;

    fn state_with_pages(total_pages: u32) -> PageState {
        let mut state = PageState::new(RegistrantType::Driver);
        state.record_total_pages(total_pages);
        state
    }

    #[test]
    fn set_page_is_a_no_op_outside_range() {
        let mut state = state_with_pages(3);
        assert!(!state.set_page(0));
        assert!(!state.set_page(4));
        assert_eq!(state.current_page, 1);

        assert!(state.set_page(3));
        assert_eq!(state.current_page, 3);
    }

    #[test]
    fn set_page_does_not_disturb_filters() {
        let mut state = state_with_pages(5);
        state.set_search_term(Some("ambu".to_owned()));
        state.set_selected_date(NaiveDate::from_ymd_opt(2025, 6, 1));

        state.set_page(4);

        assert_eq!(state.search_term.as_deref(), Some("ambu"));
        assert_eq!(state.selected_date, NaiveDate::from_ymd_opt(2025, 6, 1));
    }

    #[test]
    fn every_filter_change_resets_to_page_one() {
        let mut state = state_with_pages(8);
        state.set_page(5);
        state.set_search_term(Some("raj".to_owned()));
        assert_eq!(state.current_page, 1);

        state.set_page(5);
        state.set_selected_date(NaiveDate::from_ymd_opt(2025, 1, 15));
        assert_eq!(state.current_page, 1);

        state.set_page(5);
        state.set_page_size(20);
        assert_eq!(state.current_page, 1);

        state.set_page(5);
        state.set_registrant_type(RegistrantType::FleetOwner);
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn blank_search_terms_are_treated_as_no_filter() {
        let mut state = state_with_pages(2);
        state.set_search_term(Some("   ".to_owned()));
        assert_eq!(state.search_term, None);
    }

    #[test]
    fn zero_page_size_is_ignored() {
        let mut state = state_with_pages(2);
        state.set_page_size(0);
        assert_eq!(state.page_size, super::DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn recorded_totals_pull_a_stranded_page_back_into_range() {
        let mut state = state_with_pages(9);
        state.set_page(9);
        state.record_total_pages(4);
        assert_eq!(state.current_page, 4);
        assert_eq!(state.total_pages, 4);
    }

    #[test]
    fn window_centers_on_the_current_page() {
        let mut state = state_with_pages(30);
        state.set_page(15);
        assert_eq!(state.visible_pages(), (10..=19).collect::<Vec<_>>());
    }

    #[test]
    fn window_clamps_at_both_edges() {
        let mut state = state_with_pages(30);
        assert_eq!(state.visible_pages(), (1..=10).collect::<Vec<_>>());

        state.set_page(29);
        assert_eq!(state.visible_pages(), (21..=30).collect::<Vec<_>>());
    }

    #[test]
    fn window_shows_all_pages_when_fewer_than_the_button_budget() {
        let state = state_with_pages(3);
        assert_eq!(state.visible_pages(), vec![1, 2, 3]);
    }

    #[test]
    fn query_snapshot_reflects_the_state() {
        let mut state = state_with_pages(3);
        state.set_search_term(Some("fleet".to_owned()));
        state.set_page(2);

        let query = PageQuery::from(&state);
        assert_eq!(query.page, 2);
        assert_eq!(query.page_size, super::DEFAULT_PAGE_SIZE);
        assert_eq!(query.search_term.as_deref(), Some("fleet"));
        assert_eq!(query.registrant_type, RegistrantType::Driver);
    }
}
