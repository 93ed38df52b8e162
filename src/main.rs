use clap::Parser;
use gantry::cli::commands::Cli;
use gantry::cli::handlers;

fn main() {
    let cli = Cli::parse();
    let config_dir = cli.config_dir.clone();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            if let Err(e) = gantry::tui::run(config_dir.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
