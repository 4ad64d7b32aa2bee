use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{self, ConnectInfo},
    http::HeaderMap,
    middleware::Next,
    response::IntoResponse,
};

/// The address a request originates from. `None` if neither a parseable
/// `x-forwarded-for` header nor the peer address is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub Option<IpAddr>);

impl ClientIp {
    /// The first `x-forwarded-for` entry wins over the peer address.
    pub fn from_parts(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        match headers.get("x-forwarded-for") {
            Some(forwarded) => ClientIp(
                forwarded
                    .to_str()
                    .ok()
                    .and_then(|v| v.split(',').next())
                    .and_then(|v| v.trim().parse().ok()),
            ),
            None => ClientIp(peer.map(|peer| peer.ip())),
        }
    }
}

pub async fn client_ip_middleware(req: extract::Request, next: Next) -> impl IntoResponse {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client_ip = ClientIp::from_parts(req.headers(), peer);

    let mut req = req;
    req.extensions_mut().insert(client_ip);

    next.run(req).await
}
