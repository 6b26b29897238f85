use chrono::NaiveDate;

use kycdesk_core::config::AppConfig;
use kycdesk_core::{PageState, RegistrantType};
use kycdesk_workbench::{ViewState, Workbench};

use super::CommandResult;

pub async fn run(
    config: &AppConfig,
    registrant_type: Option<RegistrantType>,
    page: u32,
    page_size: Option<u32>,
    search: Option<String>,
    date: Option<NaiveDate>,
) -> CommandResult {
    let directory = match super::directory(config) {
        Ok(directory) => directory,
        Err(error) => return CommandResult::failure("list", "backend_client", error.to_string(), 2),
    };
    let transport = match super::transport(config) {
        Ok(transport) => transport,
        Err(error) => return CommandResult::failure("list", "backend_client", error.to_string(), 2),
    };

    let registrant_type =
        registrant_type.unwrap_or(config.workbench.default_registrant_type);
    let mut page_state = PageState::new(registrant_type);
    page_state.set_page_size(page_size.unwrap_or(config.workbench.page_size));
    page_state.set_search_term(search);
    page_state.set_selected_date(date);

    let mut workbench = Workbench::new(directory, transport, page_state);
    workbench.refresh().await;
    if page > 1 {
        workbench.set_page(page).await;
    }

    match workbench.state() {
        ViewState::Ready => CommandResult { exit_code: 0, output: render(&workbench) },
        ViewState::Error(message) => CommandResult::failure("list", "fetch", message.clone(), 3),
        other => CommandResult::failure("list", "internal", format!("unexpected state {other:?}"), 1),
    }
}

fn render<D, T>(workbench: &Workbench<D, T>) -> String
where
    D: kycdesk_core::RegistrantDirectory + kycdesk_core::ApprovalStatusSource,
    T: kycdesk_core::ApprovalTransport,
{
    let state = workbench.page_state();
    let mut lines = vec![format!(
        "{} registrants, page {}/{} ({} rows)",
        state.registrant_type,
        state.current_page,
        state.total_pages,
        workbench.rows().len()
    )];

    for row in workbench.rows() {
        lines.push(format!(
            "- {} | {} | {}",
            row.registrant.id, row.registrant.display_name, row.registrant.phone_number
        ));
        for cell in &row.cells {
            lines.push(format!(
                "    {:<22} {:<9} {}",
                cell.field.label(),
                cell.status.state,
                cell.value
            ));
        }
    }

    if workbench.rows().is_empty() {
        lines.push("  (no registrants match the current filters)".to_string());
    }

    lines.join("\n")
}
