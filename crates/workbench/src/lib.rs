pub mod details;
pub mod orchestrator;
pub mod rows;

pub use details::resolve;
pub use orchestrator::{FetchOutcome, FetchTicket, ViewState, Workbench};
pub use rows::{FieldCell, RegistrantRow};
