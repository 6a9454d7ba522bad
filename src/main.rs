use clap::Parser;
use tasklist::cli::commands::Cli;
use tasklist::cli::handlers;
use tasklist::io::config_io;
use tasklist::logging;

fn main() {
    let cli = Cli::parse();
    let home = config_io::resolve_home(cli.home.as_deref());

    let config = match config_io::read_config(&home) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        None => {
            // No subcommand → launch TUI
            logging::init_file(&home, &config.log.level);
            let result = handlers::open_list(&home, &config)
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
                .and_then(|list| tasklist::tui::run(&home, &config, list));
            if let Err(e) = result {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            logging::init_stderr(&config.log.level);
            if let Err(e) = handlers::dispatch(cli, &home, &config) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
