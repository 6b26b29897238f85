use kycdesk_core::config::AppConfig;
use kycdesk_core::domain::kyc::{
    AadhaarDetail, BankDetail, DlDetail, FieldDetailPayload, PanDetail, RcDetail,
};
use kycdesk_core::{FieldKey, PageState, RegistrantId, RegistrantType};
use kycdesk_workbench::{ViewState, Workbench};

use super::CommandResult;

pub async fn run(
    config: &AppConfig,
    registrant_type: Option<RegistrantType>,
    id: &str,
    field: FieldKey,
) -> CommandResult {
    let directory = match super::directory(config) {
        Ok(directory) => directory,
        Err(error) => return CommandResult::failure("show", "backend_client", error.to_string(), 2),
    };
    let transport = match super::transport(config) {
        Ok(transport) => transport,
        Err(error) => return CommandResult::failure("show", "backend_client", error.to_string(), 2),
    };

    let registrant_type =
        registrant_type.unwrap_or(config.workbench.default_registrant_type);
    let mut page_state = PageState::new(registrant_type);
    page_state.set_search_term(Some(id.to_owned()));

    let mut workbench = Workbench::new(directory, transport, page_state);
    workbench.refresh().await;
    if let ViewState::Error(message) = workbench.state() {
        return CommandResult::failure("show", "fetch", message.clone(), 3);
    }

    let registrant_id = RegistrantId(id.to_owned());
    match workbench.open_field(&registrant_id, field).await {
        Some(payload) => {
            let status = workbench.status(&registrant_id, field);
            let mut lines = vec![format!(
                "{} for {} (status: {})",
                payload.field_label(),
                registrant_id,
                status.state
            )];
            if let Some(remark) = status.remark {
                lines.push(format!("remark: {remark}"));
            }
            lines.extend(render_payload(&payload));
            CommandResult { exit_code: 0, output: lines.join("\n") }
        }
        None => CommandResult::failure(
            "show",
            "not_found",
            format!("no {registrant_type} registrant `{id}` on the current page"),
            4,
        ),
    }
}

fn render_payload(payload: &FieldDetailPayload) -> Vec<String> {
    match payload {
        FieldDetailPayload::Aadhaar(detail) => render_aadhaar(detail),
        FieldDetailPayload::Pan(detail) => render_pan(detail),
        FieldDetailPayload::Dl(detail) => render_dl(detail),
        FieldDetailPayload::Bank(detail) => render_bank(detail),
        FieldDetailPayload::Rc(detail) => render_rc(detail),
        FieldDetailPayload::Plain { value, .. } => vec![format!("  value: {value}")],
    }
}

fn line(key: &str, value: &Option<String>) -> String {
    format!("  {key}: {}", value.as_deref().unwrap_or("N/A"))
}

fn render_aadhaar(detail: &AadhaarDetail) -> Vec<String> {
    vec![
        line("number", &detail.aadhar_number),
        line("name", &detail.name),
        line("dob", &detail.dob),
        line("gender", &detail.gender),
        line("care of", &detail.care_of),
        line("address", &detail.address),
        line("status", &detail.status),
    ]
}

fn render_pan(detail: &PanDetail) -> Vec<String> {
    vec![
        line("pan", &detail.pan),
        line("name", &detail.name),
        line("dob", &detail.dob),
        line("pan status", &detail.pan_status),
        line("name match", &detail.name_match),
        line("dob match", &detail.dob_match),
        line("aadhaar seeding", &detail.aadhaar_seeding_status),
    ]
}

fn render_dl(detail: &DlDetail) -> Vec<String> {
    let mut lines = vec![
        line("dl number", &detail.dl_number),
        line("dob", &detail.dob),
        line("status", &detail.status),
    ];
    if let Some(licence) = &detail.details_of_driving_licence {
        lines.push(line("name", &licence.name));
        lines.push(line("father/husband", &licence.father_or_husband_name));
        lines.push(line("address", &licence.address));
        lines.push(line("date of issue", &licence.date_of_issue));
        if let Some(covs) = &licence.cov_details {
            lines.push(format!("  vehicle classes: {}", covs.join(", ")));
        }
    }
    if let Some(validity) = &detail.dl_validity {
        if let Some(transport) = &validity.transport {
            lines.push(format!(
                "  transport validity: {} to {}",
                transport.from.as_deref().unwrap_or("N/A"),
                transport.to.as_deref().unwrap_or("N/A")
            ));
        }
        if let Some(non_transport) = &validity.non_transport {
            lines.push(format!(
                "  non-transport validity: {} to {}",
                non_transport.from.as_deref().unwrap_or("N/A"),
                non_transport.to.as_deref().unwrap_or("N/A")
            ));
        }
    }
    lines
}

fn render_bank(detail: &BankDetail) -> Vec<String> {
    vec![
        line("name at bank", &detail.name_at_bank),
        line("bank", &detail.bank_name),
        line("branch", &detail.branch),
        line("city", &detail.city),
        line("micr", &detail.micr),
        line("account status", &detail.account_status),
        line("name match", &detail.name_match_result),
    ]
}

fn render_rc(detail: &RcDetail) -> Vec<String> {
    vec![
        line("registration no", &detail.reg_no),
        line("owner", &detail.owner),
        line("manufacturer", &detail.vehicle_manufacturer_name),
        line("model", &detail.vehicle_model),
        line("colour", &detail.vehicle_colour),
        line("class", &detail.vehicle_class),
        line("chassis", &detail.chassis),
        line("engine", &detail.engine),
        line("registered", &detail.reg_date),
        line("rc expiry", &detail.rc_expiry_date),
        line("rc status", &detail.rc_status),
        line("seats", &detail.vehicle_seat_capacity),
        line("insurer", &detail.vehicle_insurance_company_name),
        line("insured upto", &detail.vehicle_insurance_upto),
    ]
}
