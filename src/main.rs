use tracing_subscriber::EnvFilter;

use nbcli::cli::execute_command;

/// Main entry point for the program
#[tokio::main]
async fn main() {
    // Initialize the logging subsystem
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Parse and execute the CLI command
    match execute_command().await {
        Ok(()) => std::process::exit(exitcode::OK),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(e.exit_code().code());
        }
    }
}
