use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Stateless pass-through to the DeepL v2 REST API. Used three times per
/// submission (input and prompt to the model language, reply back to the
/// display language) and once per session start for the persona message.
pub struct Translator {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    text: [&'a str; 1],
    target_lang: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
struct Translation {
    text: String,
}

impl Translator {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            url: cfg.translate_url.clone(),
            api_key: cfg.deepl_api_key.clone(),
        })
    }

    pub async fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        let request = TranslateRequest {
            text: [text],
            target_lang,
        };

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .json(&request)
            .send()
            .await
            .context("translation request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("translation request failed: {} {}", status, body));
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .context("failed to decode translation response")?;
        parsed
            .translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or_else(|| anyhow!("translation response contained no text"))
    }
}
