use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;

use jpq::config::{self, Config};
use jpq::input::{DocumentOrigin, load_document};
use jpq::progress::{StatusSurface, StderrStatus};
use jpq::{ExecutionWorkerPool, QueryError, QueryOrchestrator, ResultStore};

/// Run a JSONPath query against a JSON document
#[derive(Parser, Debug)]
#[command(version, about = "Run JSONPath queries against JSON documents")]
struct Args {
    /// JSONPath expression, e.g. '$.a[0].b.c'
    query: String,

    /// Input JSON file (if not provided, reads from stdin)
    input: Option<PathBuf>,

    /// Return {"path", "value"} pairs instead of bare values
    #[arg(long)]
    nodes: bool,

    /// Print the result locator instead of the result document
    #[arg(long)]
    locator: bool,
}

fn main() -> Result<()> {
    // Writes to /tmp/jpq-debug.log at DEBUG level
    #[cfg(debug_assertions)]
    init_debug_log();

    color_eyre::install()?;

    // Load config early to avoid defaults during startup
    let config_result = config::load_config();
    if let Some(warning) = &config_result.warning {
        eprintln!("{}", warning);
    }

    let args = Args::parse();

    let status: Arc<dyn StatusSurface> = Arc::new(StderrStatus);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let result = runtime.block_on(run(args, &config_result.config, status.clone()));
    // Stops the progress ticker if it is still running
    drop(runtime);

    #[cfg(debug_assertions)]
    log::debug!("=== JPQ DEBUG SESSION ENDED ===");

    if let Err(e) = result {
        eprintln!("{}", report_failure(status.as_ref(), &e));
        std::process::exit(1);
    }

    Ok(())
}

/// Take down the status line and render the error as one message
fn report_failure(status: &dyn StatusSurface, error: &QueryError) -> String {
    status.clear();
    log::debug!("Query failed: {:?}", error);
    error.to_string()
}

#[cfg(debug_assertions)]
fn init_debug_log() {
    use std::io::Write;

    let Ok(log_file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("/tmp/jpq-debug.log")
    else {
        return;
    };

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .format(|buf, record| {
            use std::time::SystemTime;
            let datetime: chrono::DateTime<chrono::Local> = SystemTime::now().into();
            writeln!(
                buf,
                "[{}] [{}] {}",
                datetime.format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .init();

    log::debug!("=== JPQ DEBUG SESSION STARTED ===");
}

async fn run(
    args: Args,
    config: &Config,
    status: Arc<dyn StatusSurface>,
) -> Result<(), QueryError> {
    let origin = DocumentOrigin::from_path(args.input);
    let loaded = load_document(&origin, config.source.large_file_threshold)?;
    if let Some(warning) = &loaded.warning {
        eprintln!("{}", warning);
    }

    let pool = Arc::new(ExecutionWorkerPool::default());
    let orchestrator = QueryOrchestrator::new(
        pool.clone(),
        Arc::new(ResultStore::new()),
        status,
    )
    .with_progress_settings(config.progress.settings());

    let outcome = orchestrator
        .run(&args.query, loaded.document, args.nodes)
        .await;
    pool.shutdown().await;

    let Some(outcome) = outcome? else {
        return Ok(());
    };

    // Evaluation is over, the indicator has nothing left to report
    outcome.progress.dispose();
    outcome.progress.disposed().await;

    if args.locator {
        println!("{}", outcome.artifact);
    } else {
        let rendered = orchestrator
            .store()
            .render(&outcome.artifact, config.output.pretty)?;
        println!("{}", rendered);
    }

    Ok(())
}
