use crate::error::PostcoderError;

pub const DEFAULT_BASE_URL: &str = "https://ws.postcoder.com/pcw";

pub const API_KEY_VAR: &str = "POSTCODER_API_KEY";
pub const BASE_URL_VAR: &str = "POSTCODER_BASE_URL";

/// Client configuration: the API key and the service root it is sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Reads `POSTCODER_API_KEY` and, optionally, `POSTCODER_BASE_URL`,
    /// after loading a `.env` file if one exists.
    pub fn from_env() -> Result<Self, PostcoderError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, PostcoderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| PostcoderError::missing("api_key"))?;

        let base_url = match lookup(BASE_URL_VAR).filter(|url| !url.trim().is_empty()) {
            Some(url) => {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(PostcoderError::local(format!(
                        "{BASE_URL_VAR} must start with http:// or https://"
                    )));
                }
                url
            }
            None => DEFAULT_BASE_URL.to_string(),
        };

        tracing::debug!(base_url = %base_url, "postcoder configuration loaded");

        Ok(Self { api_key, base_url })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::ErrorKind;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_base_url() {
        let config = Config::from_lookup(lookup(&[(API_KEY_VAR, "PCW45-12345-12345-1234X")])).unwrap();
        assert_eq!(config, Config::new("PCW45-12345-12345-1234X"));
    }

    #[test]
    fn reads_base_url_override() {
        let config = Config::from_lookup(lookup(&[
            (API_KEY_VAR, "key"),
            (BASE_URL_VAR, "http://127.0.0.1:3000/pcw"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000/pcw");
    }

    #[test]
    fn rejects_missing_or_blank_key() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err.to_string(), "Required parameter is missing: api_key");

        let err = Config::from_lookup(lookup(&[(API_KEY_VAR, "   ")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parameter);
    }

    #[test]
    fn rejects_base_url_without_scheme() {
        let err = Config::from_lookup(lookup(&[
            (API_KEY_VAR, "key"),
            (BASE_URL_VAR, "ws.postcoder.com/pcw"),
        ]))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parameter);
    }
}
