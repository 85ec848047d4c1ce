//! Rate limiting middleware using token bucket algorithm.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Where the client IP used as rate limit key comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientIp {
    /// Socket peer address. Requires `ConnectInfo<SocketAddr>`.
    Peer,
    /// `X-Forwarded-For` / `X-Real-IP` / `Forwarded`, falling back to the peer.
    /// Use only behind a trusted reverse proxy.
    Forwarded,
}

impl ClientIp {
    pub fn from_behind_proxy(behind_proxy: bool) -> Self {
        if behind_proxy {
            ClientIp::Forwarded
        } else {
            ClientIp::Peer
        }
    }
}

/// Token bucket parameters.
#[derive(Debug, Clone, Copy)]
pub struct Quota {
    /// Seconds between replenished requests.
    pub per_second: u64,
    pub burst_size: u32,
}

/// Link creation, lookup and resolution: burst of 100, one request replenished
/// every 2 seconds.
pub const PUBLIC: Quota = Quota {
    per_second: 2,
    burst_size: 100,
};

/// File uploads: burst of 10, one request replenished every second.
pub const UPLOADS: Quota = Quota {
    per_second: 1,
    burst_size: 10,
};

/// Layer keyed on the socket peer address.
pub fn peer_layer(
    quota: Quota,
) -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(quota.per_second)
            .burst_size(quota.burst_size)
            .finish()
            .expect("rate limit quota must be non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Layer keyed on the forwarded client address.
pub fn forwarded_layer(
    quota: Quota,
) -> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_second(quota.per_second)
            .burst_size(quota.burst_size)
            .finish()
            .expect("rate limit quota must be non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Applies a per-client rate limit to every route of `router`.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Example
///
/// ```rust,ignore
/// let uploads = rate_limit::apply(
///     Router::new().route("/files", post(files_handler)),
///     ClientIp::Peer,
///     rate_limit::UPLOADS,
/// );
/// ```
pub fn apply<S>(router: Router<S>, client_ip: ClientIp, quota: Quota) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    match client_ip {
        ClientIp::Peer => router.layer(peer_layer(quota)),
        ClientIp::Forwarded => router.layer(forwarded_layer(quota)),
    }
}
