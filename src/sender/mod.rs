pub mod client;
pub mod dispatcher;

pub use client::{
    ClientConfig, ClientError, ConnectionStats, DEFAULT_API_URL, DEFAULT_TIMEOUT, QuarantineApi,
    QuarantineClient,
};
pub use dispatcher::{DispatchStats, DispatchStatsSnapshot, Dispatcher};
