//! DeFi Sentinel - terminal client for the contract risk-analysis backend
//!
//! Usage:
//!   defi_sentinel contract <ADDRESS>
//!   defi_sentinel token <ADDRESS>
//!   defi_sentinel gas <ADDRESS>
//!   defi_sentinel history <ADDRESS> [--depth deep] [--range 7d] [--wait]
//!
//! Environment:
//!   SENTINEL_API_BASE_URL      - Backend base URL
//!   SENTINEL_HTTP_TIMEOUT_SECS - Per-request timeout (default: 30)
//!   RUST_LOG                   - Log filter (default: defi_sentinel=info)

use clap::{Parser, Subcommand};
use defi_sentinel::core::{AnalysisFlow, AnalysisView, PollingController, SessionState};
use defi_sentinel::models::{AnalysisConfig, AnalysisDepth, AppResult, ClientConfig, TimeRange};
use defi_sentinel::presenters::{
    history::progress_banner, render_contract_analysis, render_gas_analysis, render_session,
    render_token_analysis,
};
use defi_sentinel::providers::ApiClient;
use defi_sentinel::utils::constants::{APP_NAME, APP_VERSION};
use eyre::Result;
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "defi_sentinel", version, about = "Contract and token risk reports from the DeFi Sentinel backend")]
struct Cli {
    /// Backend base URL (overrides SENTINEL_API_BASE_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Print the decoded payload as JSON instead of a report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Security analysis of a contract
    Contract { address: String },
    /// Risk analysis of a token
    Token { address: String },
    /// Gas usage analysis of a contract
    Gas { address: String },
    /// Transaction, event and modification history of a contract
    History {
        address: String,
        /// quick, standard or deep
        #[arg(long, default_value_t = AnalysisDepth::Standard)]
        depth: AnalysisDepth,
        /// 1h, 24h, 7d or 30d
        #[arg(long, default_value_t = TimeRange::OneDay)]
        range: TimeRange,
        #[arg(long)]
        no_holders: bool,
        #[arg(long)]
        no_governance: bool,
        /// Keep polling a deferred analysis until it completes
        #[arg(long)]
        wait: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "defi_sentinel=info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let cli = Cli::parse();
    if !cli.json {
        print_banner();
    }

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config = config.with_base_url(url);
    }
    let client = Arc::new(ApiClient::new(config)?);
    let flow = AnalysisFlow::new(client.clone());

    let ok = match cli.command {
        Commands::Contract { address } => {
            show(flow.analyze_contract(&address).await, cli.json, render_contract_analysis)?
        }
        Commands::Token { address } => {
            show(flow.analyze_token(&address).await, cli.json, render_token_analysis)?
        }
        Commands::Gas { address } => {
            show(flow.analyze_gas(&address).await, cli.json, render_gas_analysis)?
        }
        Commands::History {
            address,
            depth,
            range,
            no_holders,
            no_governance,
            wait,
        } => {
            let analysis = AnalysisConfig {
                depth,
                include_holders: !no_holders,
                include_governance: !no_governance,
                time_range: range,
            };
            run_history(client, &address, &analysis, wait, cli.json).await?
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Print a single-shot result; returns whether it succeeded
fn show<T: Serialize>(result: AppResult<T>, json: bool, render: fn(&T) -> String) -> Result<bool> {
    let retryable = result.as_ref().err().is_some_and(|e| e.code.is_retryable());

    let mut view = AnalysisView::default();
    view.begin();
    view.update(result);

    match (&view.data, &view.error) {
        (Some(data), None) if json => println!("{}", serde_json::to_string_pretty(data)?),
        (Some(data), None) => println!("{}", render(data)),
        (_, error) => {
            eprintln!("❌ {}", error.as_deref().unwrap_or("Unknown error"));
            if retryable {
                eprintln!("   The backend could not be reached; retrying may help.");
            }
            return Ok(false);
        }
    }
    Ok(true)
}

async fn run_history(
    client: Arc<ApiClient>,
    address: &str,
    analysis: &AnalysisConfig,
    wait: bool,
    json: bool,
) -> Result<bool> {
    let controller = PollingController::with_config(client.clone(), client.config());
    let mut session = controller.submit(address, analysis, wait).await;
    let mut updates = session.subscribe();

    let state = loop {
        let state = updates.borrow_and_update().clone();
        if state.is_settled() {
            break state;
        }
        if let SessionState::Polling {
            handle, attempts, ..
        } = &state
        {
            if *attempts == 0 && !json {
                println!("{}", render_session(&state));
            } else {
                info!("{}", progress_banner(handle, Some(*attempts)).replace('\n', " "));
            }
        }

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break updates.borrow().clone();
                }
            }
            _ = tokio::signal::ctrl_c() => {
                session.teardown();
                eprintln!("\n🛑 Polling cancelled");
                return Ok(false);
            }
        }
    };

    if json {
        match (state.error_message(), state.data()) {
            (None, Some(data)) => println!("{}", serde_json::to_string_pretty(data)?),
            (message, _) => eprintln!("❌ {}", message.unwrap_or("No result")),
        }
    } else {
        print!("{}", render_session(&state));
    }

    if let SessionState::Failed { error, .. } = &state {
        if error.code.is_retryable() {
            eprintln!("   The backend could not be reached; retrying may help.");
        }
    }
    Ok(state.error_message().is_none())
}

fn print_banner() {
    println!(
        r#"
    ╔══════════════════════════════════════════════════════════════╗
    ║                                                              ║
    ║   🛡️  {:<20} v{:<10}                         ║
    ║       Contract & token risk analysis                         ║
    ║                                                              ║
    ╚══════════════════════════════════════════════════════════════╝
    "#,
        APP_NAME, APP_VERSION
    );
}
