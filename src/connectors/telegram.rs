// src/connectors/telegram.rs
use crate::connectors::traits::Notifier;
use crate::error::NotifyError;
use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

pub struct TelegramNotifier {
    http: Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(http: Client, bot_token: String, chat_id: String) -> Self {
        Self {
            http,
            bot_token,
            chat_id,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> Result<(), NotifyError> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        self.http
            .post(&url)
            .form(&[("chat_id", self.chat_id.as_str()), ("text", text)])
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Stand-in when no chat credentials are configured: messages land in the
/// log only and the run proceeds as usual.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, text: &str) -> Result<(), NotifyError> {
        info!("📣 (no channel configured)\n{text}");
        Ok(())
    }
}
