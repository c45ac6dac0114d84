use clap::{Command, CommandFactory, Parser};
use clap_complete::{generate, Generator};
use pessoas::actors::store_actor_sqlite::StoreConfig;
use pessoas::cli;
use pessoas::cli::Commands;
use pessoas::io::net::api_server;
use pessoas::io::net::api_server::HttpServerConfig;
use pessoas::pessoa::store::PessoaStore;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Builder;
use tracing::error;
use tracing::info;
use tracing_subscriber::EnvFilter;

async fn run_serve(pcli: cli::Cli) -> Result<(), String> {
    let store_config = StoreConfig::new(Some(pcli.dbfile), pcli.memory_only, !pcli.disable_wal);
    let store = PessoaStore::initialize(pcli.buffer, &store_config)
        .await
        .map_err(|e| format!("can not open store {store_config}: {e}"))?;

    let uipath = if pcli.disable_ui {
        None
    } else {
        Some(pcli.uipath)
    };
    let mut server_config = HttpServerConfig::new(
        Some(pcli.port),
        Some(pcli.interface),
        pcli.external_host,
        uipath,
        Some(PathBuf::from(pcli.home_page)),
    );
    server_config.open_browser = !pcli.no_browser;

    api_server::serve(store, server_config)
        .await
        .map_err(|e| format!("server failed: {e}"))
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

/// control logging of pessoas and various libs via `RUST_LOG` env var like so:
/// `RUST_LOG=debug,sqlx=warn pessoas`
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pessoas=info")),
        )
        .init();

    let pcli = cli::Cli::parse();

    if let Some(Commands::Completions { shell }) = &pcli.command {
        let mut cmd = cli::Cli::command();
        print_completions(*shell, &mut cmd);
        return ExitCode::SUCCESS;
    }

    info!("pessoas started");

    // one worker thread; requests interleave at store calls
    let runtime = match Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Error creating runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let code = match runtime.block_on(run_serve(pcli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    };

    info!("pessoas stopped.");
    code
}
