use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    kycdesk_cli::run().await
}
