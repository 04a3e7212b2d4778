use crate::pipeline::config::Config;

/// Endpoint settings for the live timeline stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamingConfig {
    pub base_url: String,
    pub access_token: String,
    pub local_only: bool,
}

impl StreamingConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.credentials.base_url().to_string(),
            access_token: config.credentials.access_token.clone(),
            local_only: config.local_only,
        }
    }

    pub fn timeline_url(&self) -> String {
        if self.local_only {
            format!("{}/api/v1/streaming/public/local", self.base_url)
        } else {
            format!("{}/api/v1/streaming/public", self.base_url)
        }
    }
}

/// Endpoint settings for publishing reports as statuses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    pub base_url: String,
    pub access_token: String,
    pub visibility: String,
}

impl PublishConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.credentials.base_url().to_string(),
            access_token: config.credentials.access_token.clone(),
            visibility: config.visibility.clone(),
        }
    }

    pub fn statuses_url(&self) -> String {
        format!("{}/api/v1/statuses", self.base_url)
    }
}
