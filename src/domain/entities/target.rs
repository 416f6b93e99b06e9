use std::fmt;
use std::path::PathBuf;

/// A monitored target. The `id` is the key into the persisted state map
/// and the dedup key for alerts about this target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub id: String,
    pub kind: TargetKind,
}

/// What a target is, which decides the signal source and rule family
/// applied to it. One family per kind; they never compete for the same
/// action slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetKind {
    /// A compose service scaled up and down on resource utilization.
    Service { name: String },
    /// An HTTP endpoint probed for liveness.
    Endpoint { url: String },
    /// An IP address seen failing authentication in a log file.
    IpSource { ip: String, log_path: PathBuf },
    /// A TLS certificate tracked for expiry.
    Certificate { domain: String },
}

impl Target {
    #[must_use]
    pub fn service(name: &str) -> Self {
        Self {
            id: format!("service:{name}"),
            kind: TargetKind::Service {
                name: name.to_string(),
            },
        }
    }

    #[must_use]
    pub fn endpoint(url: &str) -> Self {
        Self {
            id: format!("endpoint:{url}"),
            kind: TargetKind::Endpoint {
                url: url.to_string(),
            },
        }
    }

    #[must_use]
    pub fn ip_source(ip: &str, log_path: PathBuf) -> Self {
        Self {
            id: format!("ip:{ip}"),
            kind: TargetKind::IpSource {
                ip: ip.to_string(),
                log_path,
            },
        }
    }

    #[must_use]
    pub fn certificate(domain: &str) -> Self {
        Self {
            id: format!("cert:{domain}"),
            kind: TargetKind::Certificate {
                domain: domain.to_string(),
            },
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
