mod cli;
mod config;
mod generate;
mod logging;
mod model;
mod storage;
mod tracker;

use std::process;

use config::Config;

fn main() {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = logging::init(config.log_level()) {
        eprintln!("Logging disabled: {e}");
    }

    if let Err(e) = cli::run(&config) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
