use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use simplenotes::{App, Cli, Config, FileStorage, NotePersistence, NoteStore, Result, StdinConfirm};

/// Log filter used when `RUST_LOG` is not set.
fn default_log_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

pub fn initialize_logger(verbose: bool) {
    let default_filter = default_log_filter(verbose);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    info!("Logger initialized");
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    let storage = FileStorage::new(config.data_dir.clone());
    info!(
        "Using data_dir={}, storage_key={}",
        storage.dir().display(),
        config.storage_key
    );

    let persistence = NotePersistence::with_key(storage, config.storage_key.clone());
    let store = NoteStore::open(persistence);

    let mut app = App::new(store, config, Box::new(StdinConfirm));
    app.run(cli.command)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    info!("Application starting up");
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
