use audioctl::{
    args::TopLevelCmd,
    logging::initialize_logging,
    panic_handler::initialize_panic_handler,
    settings::{default_settings_path, Settings},
};
use color_eyre::eyre::Result;

fn main() -> Result<()> {
    let args: TopLevelCmd = argh::from_env();

    // Not fatal, only affects colors in error reports
    let _ = enable_ansi_support::enable_ansi_support();
    initialize_panic_handler()?;

    let required = args.config.is_some();
    let settings_path = match args.config.clone() {
        Some(path) => path,
        None => default_settings_path()?,
    };
    let settings = Settings::load(&settings_path, required)?;

    let log_guard = initialize_logging(settings.get_log_level())?;
    tracing::info!(
        "{} {} starting",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let succeeded = audioctl::run(args, &settings, &settings_path)?;

    if !succeeded {
        // Flush logs, exit() skips destructors
        drop(log_guard);
        std::process::exit(libc::EXIT_FAILURE);
    }
    Ok(())
}
