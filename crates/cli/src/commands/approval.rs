use kycdesk_core::config::AppConfig;
use kycdesk_core::{
    ApprovalDispatcher, ApprovalError, ApprovalState, ApprovalSubmission, FieldKey, RegistrantId,
};

use super::CommandResult;

pub async fn run(
    config: &AppConfig,
    id: &str,
    field: FieldKey,
    state: ApprovalState,
    remark: Option<String>,
) -> CommandResult {
    let transport = match super::transport(config) {
        Ok(transport) => transport,
        Err(error) => {
            return CommandResult::failure("approval", "backend_client", error.to_string(), 2)
        }
    };
    let dispatcher = ApprovalDispatcher::new(transport);

    let submission =
        ApprovalSubmission { registrant_id: RegistrantId(id.to_owned()), field, state, remark };

    match dispatcher.submit(&submission).await {
        Ok(()) => CommandResult::success(
            "approval",
            format!("{} recorded as {} for {id}", field.label(), state),
        ),
        Err(ApprovalError::Validation(error)) => {
            CommandResult::failure("approval", "validation", error.to_string(), 4)
        }
        Err(ApprovalError::Backend(error)) => {
            CommandResult::failure("approval", "backend", error.display_message(), 3)
        }
    }
}
