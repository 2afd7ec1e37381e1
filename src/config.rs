//! Runtime configuration.
//!
//! Every setting is a command-line flag with an environment-variable
//! fallback. Precedence: flag, then environment, then the default.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;

/// postboard: an in-memory blog post API.
#[derive(Clone, Debug, Parser)]
#[command(name = "postboard", version, about)]
pub struct Config {
    /// Address to bind.
    #[arg(long, env = "POSTBOARD_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to bind.
    #[arg(long, env = "POSTBOARD_PORT", default_value_t = 5002)]
    pub port: u16,

    /// Default log filter. `RUST_LOG` overrides it when set.
    #[arg(long, env = "POSTBOARD_LOG", default_value = "info")]
    pub log: String,

    /// Start with no posts instead of the two seed posts.
    #[arg(long, env = "POSTBOARD_EMPTY")]
    pub empty: bool,
}

impl Config {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
