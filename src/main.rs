//! Courier CLI binary entry point.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use courier::cli::{Cli, Commands};
use courier::prelude::*;
use courier::remote::http::build_client;
use courier::tools::builtin_sources;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        let code = match e.downcast_ref::<CourierError>() {
            Some(err) if err.is_precondition() => 2,
            _ => 1,
        };
        std::process::exit(code);
    }
}

fn init_logging(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

async fn run(cli: Cli) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = CourierConfig::load()?;
    let client = build_client(HTTP_TIMEOUT)?;

    // Registry errors are fatal: nothing starts with a broken tool set.
    let tools = Arc::new(ToolRegistry::discover(&builtin_sources(&config, client.clone()))?);
    tracing::debug!(tools = ?tools.names(), "tool registry ready");

    if let Commands::Tools = cli.command {
        println!("{}", serde_json::to_string_pretty(tools.descriptors())?);
        return Ok(());
    }

    let remote: Arc<dyn RemoteExecutionService> = Arc::new(OpenAiAssistants::new(
        client,
        config.require_api_key()?,
        Some(config.base_url.clone()),
    ));
    let engine = RunEngine::new(remote.clone(), Arc::new(SystemClock));
    let gateway = Gateway::new(
        remote,
        Arc::new(FileSessionStore::new(config.session_dir.clone())),
        engine,
        tools,
        config.require_assistant_id()?,
    );

    match cli.command {
        Commands::Start(args) => {
            let started = gateway
                .start_conversation(args.user.platform.as_deref(), args.user.username.as_deref())
                .await?;
            println!("{}", serde_json::to_string(&started)?);
        }
        Commands::Chat(args) => {
            let run_id = gateway.send_message(&args.thread, &args.message).await?;
            println!("{}", serde_json::json!({ "run_id": run_id }));
        }
        Commands::Check(args) => {
            let outcome = gateway.check_run(&args.thread, &args.run).await?;
            println!("{}", serde_json::to_string(&outcome)?);
        }
        Commands::Ask(args) => {
            let started = gateway
                .start_conversation(args.user.platform.as_deref(), args.user.username.as_deref())
                .await?;
            let run_id = gateway.send_message(&started.thread_id, &args.message).await?;
            let outcome = gateway.check_run(&started.thread_id, &run_id).await?;
            println!("{}", outcome.response);
        }
        Commands::Tools => {}
    }

    Ok(())
}
