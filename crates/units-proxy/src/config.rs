use clap::Parser;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

/// `units_proxy` - serves the landing page and proxies the CRM unit query.
///
/// The browser never sees CRM credentials: it calls `GET /api/units` and
/// this process authenticates upstream with a cached OAuth token.
#[derive(Parser, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// HTTP port for the API and static files.
    #[arg(long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Base URL of the CRM instance, e.g. `https://example.my.salesforce.com`.
    #[arg(long, env = "SF_INSTANCE_URL")]
    pub sf_instance_url: String,

    #[arg(long, env = "SF_CLIENT_ID")]
    pub sf_client_id: String,

    #[arg(long, env = "SF_CLIENT_SECRET", hide_env_values = true)]
    pub sf_client_secret: String,

    #[arg(long, env = "SF_USERNAME")]
    pub sf_username: String,

    #[arg(long, env = "SF_PASSWORD", hide_env_values = true)]
    pub sf_password: String,

    /// REST API version segment of the query URL.
    #[arg(long, env = "SF_API_VERSION", default_value = "v60.0")]
    pub sf_api_version: String,

    /// Directory served for every path not handled by the API.
    #[arg(long, env = "STATIC_DIR", default_value = "public")]
    pub static_dir: PathBuf,

    /// Listen address for the Prometheus metrics server. Disabled when unset.
    #[arg(long, env = "METRICS_LISTEN_ADDR")]
    pub metrics_listen_addr: Option<SocketAddr>,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "MISSING"
    } else {
        "***"
    }
}

// Secrets never reach the logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("sf_instance_url", &self.sf_instance_url)
            .field("sf_client_id", &self.sf_client_id)
            .field("sf_client_secret", &redact(&self.sf_client_secret))
            .field("sf_username", &self.sf_username)
            .field("sf_password", &redact(&self.sf_password))
            .field("sf_api_version", &self.sf_api_version)
            .field("static_dir", &self.static_dir)
            .field("metrics_listen_addr", &self.metrics_listen_addr)
            .finish()
    }
}
