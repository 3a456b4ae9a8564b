pub mod config;
pub mod initialization;
pub mod logging_system;
pub mod service;
pub mod shutdown;

pub use config::{Config, ConfigError, LogLevel};
pub use initialization::InitializationError;
pub use logging_system::{LoggingSystem, setup_logging_safe};
pub use service::{RelayService, ServiceError};
pub use shutdown::ShutdownHandle;

use crate::domain::RelayError;
use crate::sender::QuarantineClient;
use std::process;
use tracing::{error, info};

pub struct App {
    service: RelayService<QuarantineClient>,
    shutdown: ShutdownHandle,
}

impl App {
    pub async fn from_args<I, T>(args: I) -> Result<Self, RelayError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = Config::from_args_and_env(args)?;
        Self::from_config(config).await
    }

    pub async fn from_config(config: Config) -> Result<Self, RelayError> {
        setup_logging_safe(config.log_level, &config.log_directives)?;

        info!("Starting quarantine-relay v{}", env!("CARGO_PKG_VERSION"));

        let service = RelayService::bind(&config).await?;

        Ok(Self {
            service,
            shutdown: ShutdownHandle::new(),
        })
    }

    pub async fn run(self) -> Result<(), RelayError> {
        let signal_task = self.shutdown.listen_for_interrupt();

        let result = self.service.run(self.shutdown.token()).await;
        signal_task.abort();

        result?;
        info!("quarantine-relay stopped.");
        Ok(())
    }
}

// Main entry point for the application
pub async fn main() -> Result<(), RelayError> {
    match App::from_args(std::env::args_os()).await {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("Application error: {}", e);
                eprintln!("Application error: {e}");
                process::exit(1);
            }
        }
        Err(RelayError::Config(ConfigError::Cli(e))) => e.exit(),
        Err(e) => {
            error!("Startup error: {}", e);
            eprintln!("Startup error: {e}");
            process::exit(1);
        }
    }

    Ok(())
}
