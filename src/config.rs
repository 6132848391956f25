// src/config.rs
use clap::Parser;
use dotenv::dotenv;
use std::net::{IpAddr, SocketAddr};

#[derive(Parser, Debug, Clone)]
#[command(name = "business_dashboard")]
#[command(about = "Business analytics dashboard served over HTTP")]
#[command(version)]
pub struct Config {
    /// Address to bind the web server to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3030)]
    pub port: u16,

    /// Verbose logging (debug level unless RUST_LOG says otherwise)
    #[arg(short, long, env = "DASHBOARD_DEBUG")]
    pub debug: bool,
}

impl Config {
    /// Reads `.env` if present, then command-line flags with environment fallbacks.
    pub fn load() -> Self {
        dotenv().ok();
        Config::parse()
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from(["business_dashboard", "--host", "127.0.0.1", "--port", "8050", "--debug"]).unwrap();
        assert_eq!(config.socket_addr(), "127.0.0.1:8050".parse().unwrap());
        assert_eq!(config.default_log_filter(), "debug");
    }

    #[test]
    fn rejects_bad_port() {
        assert!(Config::try_parse_from(["business_dashboard", "--port", "web"]).is_err());
    }
}
