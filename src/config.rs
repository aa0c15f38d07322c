use anyhow::{anyhow, Result};
use std::env;

/// Runtime configuration, read once at startup. Credentials and the corpus
/// location are mandatory; everything else carries a default and can be
/// overridden per deployment.
#[derive(Clone, Debug)]
pub struct Config {
    pub openai_api_key: String,
    pub deepl_api_key: String,
    pub corpus_url: String,
    pub chat_url: String,
    pub embed_url: String,
    pub embed_model: String,
    pub translate_url: String,
    /// Language the completion model is addressed in.
    pub model_lang: String,
    /// Language replies are rendered in for the user.
    pub display_lang: String,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env if present so keys work without a manual `source .env`.
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let openai_api_key = var("OPENAI_API_KEY")
            .ok_or_else(|| anyhow!("OPENAI_API_KEY is not set; refusing to start"))?;
        let deepl_api_key = var("DEEPL_API_KEY")
            .ok_or_else(|| anyhow!("DEEPL_API_KEY is not set; refusing to start"))?;
        let corpus_url = var("CORPUS_URL").ok_or_else(|| {
            anyhow!(
                "CORPUS_URL is not set; it must serve a JSON array of \
                 {{philosopher, paragraph, embedding}} rows"
            )
        })?;

        Ok(Self {
            openai_api_key,
            deepl_api_key,
            corpus_url,
            chat_url: var("OPENAI_CHAT_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string()),
            embed_url: var("EMBED_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1/embeddings".to_string()),
            embed_model: var("EMBED_MODEL")
                .unwrap_or_else(|| "sentence-transformers/all-MiniLM-L6-v2".to_string()),
            translate_url: var("DEEPL_URL")
                .unwrap_or_else(|| "https://api-free.deepl.com/v2/translate".to_string()),
            model_lang: var("MODEL_LANG").unwrap_or_else(|| "EN-US".to_string()),
            display_lang: var("DISPLAY_LANG").unwrap_or_else(|| "KO".to_string()),
            request_timeout_secs: var("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn required() -> HashMap<String, String> {
        vars(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("DEEPL_API_KEY", "dl-test"),
            ("CORPUS_URL", "https://example.com/corpus.json"),
        ])
    }

    fn load(map: &HashMap<String, String>) -> Result<Config> {
        Config::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn missing_credential_fails_at_startup() {
        for key in ["OPENAI_API_KEY", "DEEPL_API_KEY"] {
            let mut map = required();
            map.remove(key);
            let err = load(&map).unwrap_err().to_string();
            assert!(err.contains(key), "error should name {}: {}", key, err);
        }
    }

    #[test]
    fn missing_corpus_url_fails_and_names_the_expected_format() {
        let mut map = required();
        map.remove("CORPUS_URL");
        let err = load(&map).unwrap_err().to_string();
        assert!(err.contains("CORPUS_URL"));
        assert!(err.contains("JSON"));
    }

    #[test]
    fn required_keys_alone_give_working_defaults() {
        let cfg = load(&required()).unwrap();
        assert_eq!(cfg.model_lang, "EN-US");
        assert_eq!(cfg.display_lang, "KO");
        assert_eq!(cfg.request_timeout_secs, 60);
        assert!(cfg.chat_url.contains("chat/completions"));
    }

    #[test]
    fn overrides_take_precedence() {
        let mut map = required();
        map.insert("MODEL_LANG".to_string(), "EN-GB".to_string());
        map.insert("REQUEST_TIMEOUT_SECS".to_string(), "15".to_string());
        let cfg = load(&map).unwrap();
        assert_eq!(cfg.model_lang, "EN-GB");
        assert_eq!(cfg.request_timeout_secs, 15);
    }
}
