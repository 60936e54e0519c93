use confique::Config;

/// Configuration for the downstream resource API
#[derive(Debug, Config, Clone)]
pub struct ResourceConfig {
    /// Base URL of the resource API
    #[config(env = "GATEWAY_RESOURCE_BASE_URL")]
    pub base_url: String,

    /// Path of the caller scoped resource (default: /api/transactions)
    #[config(env = "GATEWAY_RESOURCE_PATH", default = "/api/transactions")]
    pub path: String,
}

impl ResourceConfig {
    /// Returns the full URL of the resource endpoint
    pub fn get_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.path.is_empty() {
            base.to_string()
        } else if self.path.starts_with('/') {
            format!("{}{}", base, self.path)
        } else {
            format!("{}/{}", base, self.path)
        }
    }
}
