use super::FieldMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of the POST sent to the quarantine decision service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarantineRequest {
    pub deviceid: String,
    pub source_interface: String,
    pub ip: String,
}

impl QuarantineRequest {
    /// Build a request from extracted fields.
    ///
    /// `devid` takes precedence over `devname`; `srcip` and `srcintf` are
    /// required. Returns `None` when any of the three resolves to nothing.
    pub fn from_fields(fields: &FieldMap) -> Option<Self> {
        let deviceid = fields
            .non_empty("devid")
            .or_else(|| fields.non_empty("devname"))?;
        let ip = fields.non_empty("srcip")?;
        let source_interface = fields.non_empty("srcintf")?;

        Some(Self {
            deviceid: deviceid.to_string(),
            source_interface: source_interface.to_string(),
            ip: ip.to_string(),
        })
    }

    /// JSON rendering used both on the wire and in console records.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                "{{deviceid: {}, source_interface: {}, ip: {}}}",
                self.deviceid, self.source_interface, self.ip
            )
        })
    }
}

/// Result of one delivery attempt. Observability only; never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub success: bool,
    pub detail: String,
    pub request: QuarantineRequest,
}

impl DispatchOutcome {
    pub fn succeeded(request: QuarantineRequest, detail: impl Into<String>) -> Self {
        Self {
            success: true,
            detail: detail.into(),
            request,
        }
    }

    pub fn failed(request: QuarantineRequest, detail: impl Into<String>) -> Self {
        Self {
            success: false,
            detail: detail.into(),
            request,
        }
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            write!(f, "[quarantine] OK    → {}", self.request.to_json())
        } else {
            write!(
                f,
                "[quarantine] ERROR → {} :: {}",
                self.detail,
                self.request.to_json()
            )
        }
    }
}
