use kycdesk_core::config::AppConfig;
use kycdesk_core::{ApprovalDispatcher, ApprovalError, RegistrantId};

use super::CommandResult;

pub async fn run(config: &AppConfig, id: &str, address: &str) -> CommandResult {
    let transport = match super::transport(config) {
        Ok(transport) => transport,
        Err(error) => {
            return CommandResult::failure("set-address", "backend_client", error.to_string(), 2)
        }
    };
    let dispatcher = ApprovalDispatcher::new(transport);

    match dispatcher.update_address(&RegistrantId(id.to_owned()), address).await {
        Ok(()) => CommandResult::success("set-address", format!("address updated for {id}")),
        Err(ApprovalError::Validation(error)) => {
            CommandResult::failure("set-address", "validation", error.to_string(), 4)
        }
        Err(ApprovalError::Backend(error)) => {
            CommandResult::failure("set-address", "backend", error.display_message(), 3)
        }
    }
}
