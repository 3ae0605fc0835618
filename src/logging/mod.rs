//! Logger initialisation for binaries built on this crate

use log::{info, LevelFilter};
use thiserror::Error;

/// Errors associated with initialising the logger
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("An error occured while setting up the logger: {0}")]
    Init(#[from] log::SetLoggerError),
}

/// Install a stdout logger at `min_level`.
///
/// Must only be called once per process.
pub fn init(min_level: LevelFilter) -> Result<(), LoggingError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {:5}] {}: {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(min_level)
        .chain(std::io::stdout())
        .apply()?;

    info!("Logging initialised at {:?}", min_level);
    Ok(())
}
