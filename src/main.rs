//! Run task PR comment entrypoint.
//!
//! This is the main entrypoint for the runtask-pr-comment service.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use runtask_pr_comment::cli::{Cli, Commands, LogFormat};
use runtask_pr_comment::config::SettingsLoader;
use runtask_pr_comment::error::Result;
use runtask_pr_comment::github::GitHubClient;
use runtask_pr_comment::plan::Plan;
use runtask_pr_comment::report::ReportRenderer;
use runtask_pr_comment::runtask::RunTaskProcessor;
use runtask_pr_comment::server::{self, ServerState};
use runtask_pr_comment::tfe::TfeClient;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose, cli.log_format);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
///
/// `RUST_LOG` takes precedence over `--verbose` when set.
fn init_logging(verbose: bool, format: LogFormat) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve { port } => cmd_serve(cli.env_file.as_deref(), port).await,
        Commands::Render {
            plan,
            run_url,
            commit_url,
        } => cmd_render(&plan, &run_url, &commit_url),
    }
}

/// Run the webhook server.
async fn cmd_serve(env_file: Option<&Path>, port: Option<u16>) -> Result<()> {
    let loader = env_file.map_or_else(SettingsLoader::new, |path| {
        SettingsLoader::new().with_env_file(path)
    });
    let settings = loader.load()?;
    let port = port.unwrap_or(settings.port);

    let github = GitHubClient::new(&settings.github, settings.request_timeout)?;
    let tfe = TfeClient::new(settings.request_timeout)?;
    debug!("Created API clients");

    let state = ServerState {
        processor: RunTaskProcessor::new(tfe, github),
        hmac_key: settings.hmac_key,
    };

    info!("Starting run task server");
    server::serve(port, state).await
}

/// Render a local plan file.
fn cmd_render(plan_path: &Path, run_url: &str, commit_url: &str) -> Result<()> {
    let plan = Plan::load_file(plan_path)?;
    let rendered = ReportRenderer::new(run_url, commit_url).render(&plan)?;

    if let Some(summary) = &rendered.summary {
        info!("{summary}");
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.body.as_bytes())?;
    writeln!(stdout)?;
    Ok(())
}
