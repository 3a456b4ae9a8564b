#![allow(dead_code)]

use parking_lot::Mutex;
use quarantine_relay::domain::QuarantineRequest;
use quarantine_relay::sender::{ClientError, QuarantineApi};
use std::time::{Duration, Instant};

/// In-memory decision service that records every request it receives.
#[derive(Debug)]
pub struct RecordingApi {
    calls: Mutex<Vec<QuarantineRequest>>,
    status: u16,
}

impl RecordingApi {
    pub fn accepting() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            status: 200,
        }
    }

    pub fn rejecting(status: u16) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            status,
        }
    }

    pub fn calls(&self) -> Vec<QuarantineRequest> {
        self.calls.lock().clone()
    }
}

impl QuarantineApi for RecordingApi {
    async fn quarantine(&self, request: &QuarantineRequest) -> Result<u16, ClientError> {
        self.calls.lock().push(request.clone());
        if (200..300).contains(&self.status) {
            Ok(self.status)
        } else {
            Err(ClientError::HttpError {
                status: self.status,
                message: "rejected".to_string(),
            })
        }
    }

    fn endpoint(&self) -> &str {
        "memory://quarantine"
    }
}

pub fn request(deviceid: &str, source_interface: &str, ip: &str) -> QuarantineRequest {
    QuarantineRequest {
        deviceid: deviceid.to_string(),
        source_interface: source_interface.to_string(),
        ip: ip.to_string(),
    }
}

/// Poll `condition` until it holds, failing the test after five seconds.
pub async fn wait_for<F: Fn() -> bool>(condition: F) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(Instant::now() < deadline, "condition not met within 5s");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
