use clap::Parser;
use osgify::errors::PipelineError;
use osgify::{pipeline, rules, versions};
use osgify_config::Project;
use osgify_logger as logger;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Bundle or adapt a JavaScript project for OSGi deployment
#[derive(Parser)]
#[command(name = "osgify", disable_version_flag = true)]
struct Cli {
    /// Print component versions and exit
    #[arg(long)]
    version: bool,

    /// Project directory to operate on
    #[arg(long, default_value = ".")]
    project_dir: PathBuf,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    if cli.version {
        println!("{}", versions::render());
        return;
    }

    if let Err(e) = logger::init_with_verbosity(cli.verbose) {
        eprintln!("Warning: failed to initialize logger: {}", e);
    }

    let filter = match cli.verbose {
        0 => EnvFilter::from_default_env(),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(e) = execute(&cli) {
        // a fatal error may interrupt a running progress spinner
        logger::spinner_stop();
        logger::error(&e.to_string());
        if let Some(path) = logger::get_log_path() {
            logger::info(&format!("full log at {}", path.display()));
        }
        process::exit(1);
    }
}

fn execute(cli: &Cli) -> Result<(), PipelineError> {
    let project = Project::load(&cli.project_dir, &rules::known_rule_names())?;
    logger::debug(&format!(
        "loaded '{}' ({} project) from {}",
        project.name(),
        project.project_type(),
        project.dir().display()
    ));

    let report = pipeline::run(&project)?;

    // per-file diagnostics never fail the run; surface them and exit clean
    if report.files_with_messages().next().is_some() {
        print!("{}", report.render_text());
    }
    if report.error_count() > 0 {
        logger::warn(&format!(
            "{} file diagnostic(s) at error level; affected files were excluded from the output",
            report.error_count()
        ));
    }

    logger::success(&format!(
        "Built '{}' ({} error(s), {} warning(s))",
        project.name(),
        report.error_count(),
        report.warning_count()
    ));

    Ok(())
}
