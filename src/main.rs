use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

#[tokio::main]
async fn main() {
    let cli = huec::cli::Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = huec::run(cli).await;
    std::process::exit(exit_code);
}
