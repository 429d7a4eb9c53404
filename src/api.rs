use crate::constants::TITLE_PROMPT;
use crate::errors::{ColloquyError, ColloquyResult};
use crate::models::{Message, MessageRole};
use log::debug;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::{json, Value};

// One client for the process; reqwest pools connections internally.
static HTTP_CLIENT: Lazy<Client> = Lazy::new(Client::new);

/// Client for an OpenAI-shaped chat-completion endpoint. Endpoint and
/// model are supplied by configuration; the wire shape is fixed:
/// `{model, messages: [{role, content}]}` out, `choices[0].message.content`
/// back.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    api_url: String,
    model: String,
}

impl CompletionClient {
    pub fn new(api_url: impl Into<String>, model: impl Into<String>) -> Self {
        CompletionClient {
            api_url: api_url.into(),
            model: model.into(),
        }
    }

    /// Sends the system message plus the full conversation history and
    /// returns the generated reply.
    pub async fn complete(
        &self,
        api_key: &str,
        system_message: &str,
        history: &[Message],
    ) -> ColloquyResult<String> {
        let mut messages = vec![json!({ "role": "system", "content": system_message })];
        for message in history {
            messages.push(json!({
                "role": role_str(message.role),
                "content": message.content,
            }));
        }
        debug!("sending completion request with {} messages", messages.len());
        self.request(api_key, messages).await
    }

    /// Asks the model for a short conversation title seeded by the first
    /// user message. Best-effort: callers swallow failures.
    pub async fn generate_title(&self, api_key: &str, first_message: &str) -> ColloquyResult<String> {
        let messages = vec![
            json!({ "role": "system", "content": TITLE_PROMPT }),
            json!({ "role": "user", "content": first_message }),
        ];
        let title = self.request(api_key, messages).await?;
        Ok(title.trim().to_string())
    }

    async fn request(&self, api_key: &str, messages: Vec<Value>) -> ColloquyResult<String> {
        let payload = json!({
            "model": self.model,
            "messages": messages,
        });

        let response = HTTP_CLIENT
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ColloquyError::network(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ColloquyError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ColloquyError::decode(format!("response body is not JSON: {}", e)))?;

        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ColloquyError::decode("response missing choices[0].message.content"))?;

        Ok(content.to_string())
    }
}

fn role_str(role: MessageRole) -> &'static str {
    match role {
        MessageRole::System => "system",
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion_body(content: &str) -> Value {
        json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
    }

    #[tokio::test]
    async fn test_complete_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({ "model": "gpt-3.5-turbo" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Hi there")))
            .mount(&server)
            .await;

        let client = CompletionClient::new(
            format!("{}/v1/chat/completions", server.uri()),
            "gpt-3.5-turbo",
        );
        let reply = client
            .complete("test-key", "You are a helpful assistant.", &[Message::user("Hello")])
            .await
            .unwrap();
        assert_eq!(reply, "Hi there");
    }

    #[tokio::test]
    async fn test_complete_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let client = CompletionClient::new(server.uri(), "gpt-3.5-turbo");
        let err = client
            .complete("bad-key", "system", &[Message::user("Hello")])
            .await
            .unwrap_err();
        assert!(matches!(err, ColloquyError::Http { status: 401, .. }));
        assert!(err.is_completion_failure());
    }

    #[tokio::test]
    async fn test_complete_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let client = CompletionClient::new(server.uri(), "gpt-3.5-turbo");
        let err = client
            .complete("test-key", "system", &[Message::user("Hello")])
            .await
            .unwrap_err();
        assert!(matches!(err, ColloquyError::Decode(_)));
    }

    #[tokio::test]
    async fn test_generate_title_trims_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "messages": [
                    { "role": "system", "content": TITLE_PROMPT },
                    { "role": "user", "content": "Hello" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("  Rust questions \n")))
            .mount(&server)
            .await;

        let client = CompletionClient::new(server.uri(), "gpt-3.5-turbo");
        let title = client.generate_title("test-key", "Hello").await.unwrap();
        assert_eq!(title, "Rust questions");
    }
}
