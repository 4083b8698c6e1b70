#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub tour_api_base_url: String,
    pub tour_api_key: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub crawler_request_timeout_secs: u64,
    pub crawler_throttle_delay_ms: u64,
    pub crawler_max_pages: u32,
    pub crawler_page_size: u32,
    pub crawler_batch_size: usize,
    pub crawler_max_attempts: u32,
    pub crawler_retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("tour_api_base_url", &self.tour_api_base_url)
            .field(
                "tour_api_key",
                &self.tour_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "crawler_request_timeout_secs",
                &self.crawler_request_timeout_secs,
            )
            .field("crawler_throttle_delay_ms", &self.crawler_throttle_delay_ms)
            .field("crawler_max_pages", &self.crawler_max_pages)
            .field("crawler_page_size", &self.crawler_page_size)
            .field("crawler_batch_size", &self.crawler_batch_size)
            .field("crawler_max_attempts", &self.crawler_max_attempts)
            .field(
                "crawler_retry_backoff_base_ms",
                &self.crawler_retry_backoff_base_ms,
            )
            .finish()
    }
}
