use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    doseplan_lib::init_tracing();

    match doseplan_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
