use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    /// Root of the Bsale REST API, e.g. `https://api.bsale.io/v1`.
    pub bsale_api_url: String,
    /// Sent verbatim as the `access_token` header on every upstream call.
    pub bsale_token: String,
    /// Price list used when the caller does not pass `priceListId`.
    pub default_price_list_id: Option<String>,
    pub bsale_request_timeout_secs: u64,
    pub bsale_connect_timeout_secs: u64,
    pub bsale_user_agent: String,
    pub bind_addr: SocketAddr,
    pub public_dir: PathBuf,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bsale_api_url", &self.bsale_api_url)
            .field("bsale_token", &"[redacted]")
            .field("default_price_list_id", &self.default_price_list_id)
            .field(
                "bsale_request_timeout_secs",
                &self.bsale_request_timeout_secs,
            )
            .field(
                "bsale_connect_timeout_secs",
                &self.bsale_connect_timeout_secs,
            )
            .field("bsale_user_agent", &self.bsale_user_agent)
            .field("bind_addr", &self.bind_addr)
            .field("public_dir", &self.public_dir)
            .field("log_level", &self.log_level)
            .finish()
    }
}
