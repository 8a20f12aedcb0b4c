use clap::Parser;
use mru::cli::commands::Cli;
use mru::cli::handlers;

fn main() {
    mru::logging::init_logger();
    let cli = Cli::parse();

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
