use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

/// How a successful relay is rendered back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// Status, headers, body, time and size in one object.
    #[default]
    Full,
    /// Only the upstream body, as older clients of the relay received it.
    BodyOnly,
}

impl ResponseMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" => Some(Self::Full),
            "body-only" | "body_only" | "legacy" => Some(Self::BodyOnly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Total timeout for an upstream call; `None` keeps the client default.
    pub upstream_timeout: Option<Duration>,
    pub response_mode: ResponseMode,
    pub use_system_proxy: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3005,
            upstream_timeout: None,
            response_mode: ResponseMode::Full,
            use_system_proxy: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("HOST")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            upstream_timeout: env::var("RELAY_TIMEOUT_MS")
                .ok()
                .and_then(|t| t.parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),
            response_mode: env::var("RELAY_RESPONSE_MODE")
                .ok()
                .and_then(|m| ResponseMode::parse(&m))
                .unwrap_or_default(),
            use_system_proxy: env::var("RELAY_USE_SYSTEM_PROXY")
                .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
                .unwrap_or(false),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
