use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Cancellation shared by the supervisor and both listener loops.
///
/// Only an interrupt (Ctrl+C / SIGINT) triggers it from outside the process.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    token: CancellationToken,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn trigger(&self) {
        self.token.cancel();
    }

    /// Trigger shutdown on the first interrupt signal.
    pub fn listen_for_interrupt(&self) -> JoinHandle<()> {
        let handle = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = handle.token.cancelled() => {}
                result = signal::ctrl_c() => match result {
                    Ok(()) => {
                        info!("Shutting down.");
                        handle.trigger();
                    }
                    Err(err) => error!("Failed to listen for SIGINT: {}", err),
                },
            }
        })
    }
}
