use anyhow::Context;
use clap::Parser;
use plugman::{
    args::ReleaseArgs,
    updater::{ManifestUpdater, RunOptions},
    GlobalOpts,
};
use plugman_logger as logger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "plugman")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Plugin release manifest updater",
    long_about = "Plugman records a plugin release in a JSON plugin repository manifest. \
                  Inputs default to the GitHub Actions environment variables."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(flatten)]
    release: ReleaseArgs,
}

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let inputs = cli.release.to_inputs();
    let options = RunOptions {
        dry_run: cli.release.dry_run,
    };

    let report = ManifestUpdater::new(&inputs, options)
        .run()
        .context("Manifest update failed")?;

    if let Some(rendered) = report.rendered {
        print!("{}", rendered);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    init_tracing();
    if let Err(e) =
        logger::init_with_verbosity(cli.global.verbosity_level(), cli.global.log_file.clone())
    {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    if let Err(e) = run(&cli) {
        logger::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
