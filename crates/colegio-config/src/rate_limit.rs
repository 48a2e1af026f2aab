//! Rate limiting configuration.
//!
//! Two token buckets are configured from the environment:
//!
//! - `RATE_LIMIT_GENERAL_PER_SECOND` / `RATE_LIMIT_GENERAL_BURST_SIZE` (default 1 / 100),
//!   applied to every route under `/api`
//! - `RATE_LIMIT_AUTH_PER_SECOND` / `RATE_LIMIT_AUTH_BURST_SIZE` (default 10 / 5)
//!
//! `per_second` is the replenish interval handed to `tower_governor`: one
//! token is added every `per_second` seconds, up to `burst_size` tokens.
//! Clients are keyed by IP through [`ClientIpKeyExtractor`].

use std::net::{IpAddr, Ipv4Addr};

use axum::http::Request;
use tower_governor::GovernorError;
use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::{KeyExtractor, SmartIpKeyExtractor};

/// Keys requests by `X-Forwarded-For`, `X-Real-IP`, `Forwarded` or the peer
/// address. Requests carrying none of them share a single bucket instead of
/// being rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientIpKeyExtractor;

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        Ok(SmartIpKeyExtractor
            .extract(req)
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)))
    }
}

pub type ColegioGovernorConfig =
    GovernorConfig<ClientIpKeyExtractor, ::governor::middleware::NoOpMiddleware>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub general_per_second: u64,
    pub general_burst_size: u32,
    pub auth_per_second: u64,
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            general_per_second: 1,
            general_burst_size: 100,
            auth_per_second: 10,
            auth_burst_size: 5,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl RateLimitConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            general_per_second: env_or("RATE_LIMIT_GENERAL_PER_SECOND", defaults.general_per_second),
            general_burst_size: env_or("RATE_LIMIT_GENERAL_BURST_SIZE", defaults.general_burst_size),
            auth_per_second: env_or("RATE_LIMIT_AUTH_PER_SECOND", defaults.auth_per_second),
            auth_burst_size: env_or("RATE_LIMIT_AUTH_BURST_SIZE", defaults.auth_burst_size),
        }
    }

    #[must_use]
    pub fn general_governor_config(&self) -> ColegioGovernorConfig {
        build(self.general_per_second, self.general_burst_size)
    }

    #[must_use]
    pub fn auth_governor_config(&self) -> ColegioGovernorConfig {
        build(self.auth_per_second, self.auth_burst_size)
    }
}

// The builder only fails on zero values, which are clamped away here.
fn build(per_second: u64, burst_size: u32) -> ColegioGovernorConfig {
    GovernorConfigBuilder::default()
        .per_second(per_second.max(1))
        .burst_size(burst_size.max(1))
        .key_extractor(ClientIpKeyExtractor)
        .finish()
        .expect("rate limiter values are non-zero")
}
