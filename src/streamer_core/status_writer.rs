//! Report publisher: posts each report as a status on the configured account

use crate::pipeline::emitter::{EmitError, ReportEmitter};
use crate::pipeline::types::Report;
use crate::streamer_core::config::PublishConfig;
use async_trait::async_trait;
use std::time::Duration;

pub struct StatusWriter {
    client: reqwest::Client,
    config: PublishConfig,
}

impl StatusWriter {
    pub fn new(config: PublishConfig) -> Result<Self, EmitError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| EmitError::Http(e.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ReportEmitter for StatusWriter {
    async fn emit(&self, report: &Report) -> Result<(), EmitError> {
        let params = [
            ("status", report.text.as_str()),
            ("visibility", self.config.visibility.as_str()),
        ];

        let response = self
            .client
            .post(self.config.statuses_url())
            .bearer_auth(&self.config.access_token)
            .form(&params)
            .send()
            .await
            .map_err(|e| EmitError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmitError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        log::info!(
            "📣 Published report ({} words, visibility {})",
            report.ranked.len(),
            self.config.visibility
        );
        Ok(())
    }

    fn emitter_type(&self) -> &'static str {
        "status"
    }
}
