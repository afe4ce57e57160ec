use std::env;

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let base_url = env::var("TASKDECK_API_URL")
            .unwrap_or_else(|_| "http://localhost:4000/api".to_string())
            .trim_end_matches('/')
            .to_string();

        let bearer_token = env::var("TASKDECK_API_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let timeout_secs = env::var("TASKDECK_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Self {
            base_url,
            bearer_token,
            timeout_secs,
        }
    }
}
