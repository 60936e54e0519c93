use axum::http::HeaderValue;
use http::header::{CACHE_CONTROL, EXPIRES, PRAGMA};

/// Cache-Control directives
#[derive(Debug, Clone, Default)]
pub struct CacheControl {
    pub no_store: bool,
    pub private: bool,
}

impl CacheControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn no_store(mut self) -> Self {
        self.no_store = true;
        self
    }

    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    /// Convert to HeaderValue
    pub fn to_header_value(&self) -> HeaderValue {
        let mut parts = Vec::new();

        if self.no_store {
            parts.push("no-store");
        }
        if self.private {
            parts.push("private");
        }

        HeaderValue::from_str(&parts.join(", ")).unwrap_or(HeaderValue::from_static(""))
    }
}

/// Helper struct for setting cache-related headers
#[derive(Debug, Clone, Default)]
pub struct CacheHeaders {
    cache_control: CacheControl,
}

impl CacheHeaders {
    pub fn new(cache_control: CacheControl) -> Self {
        Self { cache_control }
    }

    /// Apply headers to a response
    pub fn apply<B>(&self, response: &mut axum::response::Response<B>) {
        let headers = response.headers_mut();
        headers.insert(CACHE_CONTROL, self.cache_control.to_header_value());

        // HTTP/1.0 caches only understand Pragma
        if self.cache_control.no_store {
            headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
            headers.insert(EXPIRES, HeaderValue::from_static("0"));
        }
    }
}

/// Common cache control presets
pub mod presets {
    use super::*;

    /// Responses derived from a freshly issued token must never be stored
    pub fn no_store() -> CacheHeaders {
        CacheHeaders::new(CacheControl::new().no_store().private())
    }
}
