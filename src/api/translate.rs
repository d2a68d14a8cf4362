// Translation backend client
// Talks to the public Google Translate "gtx" endpoint

use anyhow::{bail, Result};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct TranslateClient {
    http: reqwest::Client,
    base_url: String,
}

impl TranslateClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Translate `text` into `target`, letting the backend detect the source
    pub async fn translate(&self, text: &str, target: &str) -> Result<String> {
        let response = self
            .http
            .get(format!("{}/translate_a/single", self.base_url))
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Translation API error ({}): {}", status, body);
        }

        let body: Value = response.json().await?;
        parse_translation(&body)
    }
}

/// The response is nested arrays; `body[0]` holds one `[translated, original, ..]`
/// entry per sentence
fn parse_translation(body: &Value) -> Result<String> {
    let Some(sentences) = body.get(0).and_then(Value::as_array) else {
        bail!("Unexpected translation response shape");
    };

    let text: String = sentences
        .iter()
        .filter_map(|s| s.get(0).and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        bail!("Translation response contained no text");
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_joins_sentences() {
        let body = json!([
            [["Bonjour. ", "Hello. ", null, null, 1], ["Au revoir.", "Bye.", null, null, 1]],
            null,
            "en"
        ]);
        assert_eq!(parse_translation(&body).unwrap(), "Bonjour. Au revoir.");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_translation(&json!({"error": "nope"})).is_err());
        assert!(parse_translation(&json!([[]])).is_err());
    }

    #[tokio::test]
    async fn test_translate_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("tl", "fr"))
            .and(query_param("q", "Hello"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([[["Bonjour", "Hello"]], null, "en"])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = TranslateClient::new(reqwest::Client::new(), server.uri());
        assert_eq!(client.translate("Hello", "fr").await.unwrap(), "Bonjour");
    }

    #[tokio::test]
    async fn test_translate_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = TranslateClient::new(reqwest::Client::new(), format!("{}/", server.uri()));
        assert!(client.translate("Hello", "fr").await.is_err());
    }
}
