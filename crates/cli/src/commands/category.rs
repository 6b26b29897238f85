use kycdesk_core::config::AppConfig;
use kycdesk_core::{AmbulanceCategory, ApprovalDispatcher, ApprovalError};

use super::CommandResult;

pub async fn run(
    config: &AppConfig,
    vehicle_id: &str,
    category: AmbulanceCategory,
) -> CommandResult {
    let transport = match super::transport(config) {
        Ok(transport) => transport,
        Err(error) => {
            return CommandResult::failure("set-category", "backend_client", error.to_string(), 2)
        }
    };
    let dispatcher = ApprovalDispatcher::new(transport);

    match dispatcher.update_ambulance_category(vehicle_id, Some(category)).await {
        Ok(()) => CommandResult::success(
            "set-category",
            format!("vehicle {vehicle_id} reassigned to {}", category.label()),
        ),
        Err(ApprovalError::Validation(error)) => {
            CommandResult::failure("set-category", "validation", error.to_string(), 4)
        }
        Err(ApprovalError::Backend(error)) => {
            CommandResult::failure("set-category", "backend", error.display_message(), 3)
        }
    }
}
