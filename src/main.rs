use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use repatch_check::check::category::LengthMismatchPolicy;
use repatch_check::check::orchestrator::{BuildSetChecker, record_resources};
use repatch_check::config::{self, CheckerConfig, DEFAULT_APPS, NO_REBUILD_EXIT_CODE};
use repatch_check::resource::fetchers::GitHubResourceFetcher;
use repatch_check::resource::github::GitHubClient;
use repatch_check::resource::store::SnapshotStore;
use repatch_check::resource::stores::{GitHubSnapshotStore, SqliteSnapshotStore};

#[derive(Parser)]
#[command(name = "repatch-check")]
#[command(version, about = "Decide which patched apps need a rebuild")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Applications to check, in order
    #[arg(long, global = true, env = "PATCH_APPS", value_delimiter = ',')]
    apps: Option<Vec<String>>,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where the last build's resources are read from
    #[arg(long, value_enum, default_value_t = StoreKind::Github)]
    store: StoreKind,

    /// Repository whose latest release carries the build info
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// Local snapshot database
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Keep checking the remaining apps when one fails
    #[arg(long)]
    keep_going: bool,

    #[arg(long, value_enum)]
    on_length_mismatch: Option<LengthMismatchPolicy>,

    /// Exit with a distinct status when no app needs a rebuild
    #[arg(long)]
    require_changes: bool,

    /// Write logs to a file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<Option<PathBuf>>,
}

#[derive(Subcommand)]
enum Command {
    /// Record the current resources in the local snapshot database
    Record,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    Github,
    Sqlite,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .clone()
        .map(|path| path.unwrap_or_else(config::log_path));
    let _guard = init_logging(log_file.as_deref())?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid log file path {:?}", path))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {:?}", dir))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        dir, file_name,
    ));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}

fn open_sqlite_store(db_path: &Path) -> anyhow::Result<SqliteSnapshotStore> {
    if let Some(dir) = db_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory {:?}", dir))?;
    }

    SqliteSnapshotStore::new(db_path)
        .with_context(|| format!("Failed to open snapshot database {:?}", db_path))
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut checker_config = match &cli.config {
        Some(path) => CheckerConfig::load(path)?,
        None => CheckerConfig::default(),
    };
    if let Some(repository) = cli.repository {
        checker_config.store.repository = Some(repository);
    }
    if let Some(policy) = cli.on_length_mismatch {
        checker_config.length_mismatch = policy;
    }

    let apps = cli
        .apps
        .unwrap_or_else(|| DEFAULT_APPS.iter().map(|app| app.to_string()).collect());
    let db_path = cli.db_path.unwrap_or_else(config::db_path);

    let client = Arc::new(GitHubClient::new(&checker_config.store.api_url)?);
    let fetcher = Arc::new(GitHubResourceFetcher::new(
        client.clone(),
        checker_config.resources.clone(),
    ));

    if let Some(Command::Record) = cli.command {
        let store = open_sqlite_store(&db_path)?;
        record_resources(fetcher.as_ref(), &store, &apps).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let store: Arc<dyn SnapshotStore> = match cli.store {
        StoreKind::Github => {
            let repository = checker_config.store.repository.as_deref().context(
                "No snapshot repository configured; pass --repository or set GITHUB_REPOSITORY",
            )?;
            Arc::new(GitHubSnapshotStore::new(
                client,
                repository,
                &checker_config.store.asset_name,
            ))
        }
        StoreKind::Sqlite => Arc::new(open_sqlite_store(&db_path)?),
    };

    let checker = BuildSetChecker::new(store, fetcher, checker_config.length_mismatch);
    let build_set = if cli.keep_going {
        checker.run_isolated(&apps).await
    } else {
        checker.run(&apps).await?
    };

    if let Some(line) = build_set.output_line() {
        println!("{}", line);
    }

    if !build_set.failures.is_empty() {
        return Ok(ExitCode::FAILURE);
    }

    if cli.require_changes && !build_set.needs_rebuild() {
        return Ok(ExitCode::from(NO_REBUILD_EXIT_CODE));
    }

    Ok(ExitCode::SUCCESS)
}
