use super::Config;
use crate::buffer::HistoryBuffer;
use crate::listener::{LinePipeline, ListenerError, TcpSyslogListener, UdpSyslogListener};
use crate::sender::{ClientConfig, Dispatcher, QuarantineApi, QuarantineClient};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::app::ConfigError),
    #[error("Listener error: {0}")]
    ListenerError(#[from] ListenerError),
    #[error("Sender error: {0}")]
    SenderError(#[from] crate::sender::ClientError),
    #[error("Pattern error: {0}")]
    PatternError(#[from] crate::parser::RegexError),
}

/// Owns both listeners and the pipeline they share.
///
/// Binding happens up front so a port conflict fails startup instead of a
/// running listener.
pub struct RelayService<C> {
    udp: UdpSyslogListener,
    tcp: TcpSyslogListener,
    pipeline: Arc<LinePipeline<C>>,
}

impl RelayService<QuarantineClient> {
    pub async fn bind(config: &Config) -> Result<Self, ServiceError> {
        let client = QuarantineClient::new(ClientConfig {
            api_url: config.api_url.clone(),
            timeout: config.timeout,
            ..ClientConfig::default()
        })?;

        Self::bind_with_api(config, client).await
    }
}

impl<C: QuarantineApi + 'static> RelayService<C> {
    pub async fn bind_with_api(config: &Config, api: C) -> Result<Self, ServiceError> {
        let udp =
            UdpSyslogListener::bind(config.udp_bind_addr()?, config.max_datagram_size).await?;
        let tcp = TcpSyslogListener::bind(config.tcp_bind_addr()?).await?;

        let history = Arc::new(HistoryBuffer::new(config.history_capacity));
        let pipeline = Arc::new(LinePipeline::new(history, Dispatcher::new(api))?);

        info!(
            "Quarantine endpoint: {} (timeout {}s)",
            pipeline.dispatcher().api().endpoint(),
            config.timeout_secs
        );

        Ok(Self { udp, tcp, pipeline })
    }

    pub fn udp_addr(&self) -> SocketAddr {
        self.udp.local_addr()
    }

    pub fn tcp_addr(&self) -> SocketAddr {
        self.tcp.local_addr()
    }

    pub fn history(&self) -> Arc<HistoryBuffer> {
        Arc::clone(self.pipeline.history())
    }

    pub fn pipeline(&self) -> Arc<LinePipeline<C>> {
        Arc::clone(&self.pipeline)
    }

    /// Run both listeners until `cancel` fires or one of them fails.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), ServiceError> {
        let udp = self.udp.run(Arc::clone(&self.pipeline), cancel.clone());
        let tcp = self.tcp.run(Arc::clone(&self.pipeline), cancel.clone());

        let result = tokio::try_join!(udp, tcp);
        cancel.cancel();
        result?;
        Ok(())
    }
}
