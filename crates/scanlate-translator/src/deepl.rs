use std::time::Duration;

use async_trait::async_trait;

use crate::{LanguageCode, ProviderMetadata, TranslateError, Translation, Translator, build_client};

const DEFAULT_API_URL: &str = "https://api-free.deepl.com/v2/translate";

#[derive(Clone)]
pub struct DeepLTranslator {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl DeepLTranslator {
    pub fn new(
        api_key: String,
        api_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, TranslateError> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key,
            api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }
}

/// DeepL language codes are upper case ("EN-US", "JA")
fn deepl_code(code: &str) -> String {
    code.replace('_', "-").to_uppercase()
}

#[async_trait]
impl Translator for DeepLTranslator {
    async fn translate(
        &self,
        text: &str,
        from: Option<LanguageCode>,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError> {
        if self.api_key.is_empty() {
            return Err(TranslateError::AuthenticationError);
        }

        let target = deepl_code(&to);
        let mut params = vec![("text", text.to_string()), ("target_lang", target)];
        if let Some(from) = &from {
            let source = deepl_code(from);
            let primary = source.split('-').next().unwrap_or(&source).to_string();
            params.push(("source_lang", primary));
        }

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .form(&params)
            .send()
            .await?;

        if response.status() == 429 {
            return Err(TranslateError::RateLimitExceeded);
        }

        if response.status() == 403 {
            return Err(TranslateError::AuthenticationError);
        }

        if !response.status().is_success() {
            return Err(TranslateError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            TranslateError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        let translation = json["translations"].get(0);

        let translated_text = translation
            .and_then(|t| t["text"].as_str())
            .ok_or_else(|| TranslateError::InvalidResponse("No translation in response".to_string()))?;

        let detected = translation
            .and_then(|t| t["detected_source_language"].as_str())
            .map(str::to_lowercase);

        Ok(Translation {
            text: translated_text.to_string(),
            from: from.or(detected),
            to,
            provider: "deepl".to_string(),
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "DeepL".to_string(),
            requires_api_key: true,
            free_tier_available: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::serve_once;

    #[test]
    fn test_deepl_codes() {
        assert_eq!(deepl_code("ja"), "JA");
        assert_eq!(deepl_code("en_US"), "EN-US");
    }

    #[tokio::test]
    async fn test_translate_posts_form_with_auth_header() {
        let body = r#"{"translations":[{"detected_source_language":"EN","text":"こんにちは"}]}"#;
        let (url, request) = serve_once(200, body).await;

        let translator =
            DeepLTranslator::new("key".to_string(), Some(url), Duration::from_secs(5)).unwrap();
        let result = translator
            .translate("HELLO", None, "ja".to_string())
            .await
            .unwrap();

        assert_eq!(result.text, "こんにちは");
        assert_eq!(result.from.as_deref(), Some("en"));
        assert_eq!(result.provider, "deepl");

        let request = request.await.unwrap();
        assert!(request.head.contains("DeepL-Auth-Key key"));
        assert!(request.body.contains("text=HELLO"));
        assert!(request.body.contains("target_lang=JA"));
        assert!(!request.body.contains("source_lang"));
    }

    #[tokio::test]
    async fn test_rate_limit() {
        let (url, _request) = serve_once(429, "{}").await;
        let translator =
            DeepLTranslator::new("key".to_string(), Some(url), Duration::from_secs(5)).unwrap();
        let err = translator
            .translate("HELLO", Some("en-US".to_string()), "ja".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::RateLimitExceeded));
    }
}
