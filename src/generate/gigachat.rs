//! GigaChat chat-completion client.
//!
//! Access tokens are requested with the long-lived authorization key and
//! cached until shortly before they expire.

use super::{GenerationError, TextGenerator};
use crate::common::id::generate_request_id;
use crate::config::GigaChatSettings;
use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable holding the base64 authorization key.
pub const AUTH_TOKEN_ENV: &str = "GIGACHAT_AUTH_TOKEN";
/// Environment variable holding an optional session cookie.
pub const COOKIE_ENV: &str = "GIGACHAT_COOKIE";

/// Tokens with less validity left than this are refreshed.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 5;

#[derive(Clone)]
pub struct GigaChatCredentials {
    pub auth_token: String,
    pub cookie: Option<String>,
}

impl std::fmt::Debug for GigaChatCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GigaChatCredentials")
            .field("auth_token", &"<redacted>")
            .field("cookie", &self.cookie.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl GigaChatCredentials {
    pub fn from_env() -> Result<Self, GenerationError> {
        let auth_token = std::env::var(AUTH_TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or(GenerationError::MissingCredentials(AUTH_TOKEN_ENV))?;
        let cookie = std::env::var(COOKIE_ENV)
            .ok()
            .filter(|cookie| !cookie.trim().is_empty());
        Ok(Self { auth_token, cookie })
    }
}

/// A bearer token and its expiry in unix seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCache {
    pub token: String,
    pub expires_at: i64,
}

impl TokenCache {
    pub fn is_valid_at(&self, now: i64) -> bool {
        self.expires_at - now > TOKEN_REFRESH_MARGIN_SECS
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    tok: String,
    exp: i64,
}

impl From<TokenResponse> for TokenCache {
    fn from(response: TokenResponse) -> Self {
        // Some deployments report the expiry in milliseconds
        let expires_at = if response.exp > 100_000_000_000 {
            response.exp / 1000
        } else {
            response.exp
        };
        Self {
            token: response.tok,
            expires_at,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
    temperature: f64,
    top_p: f64,
    n: u32,
    stream: bool,
    max_tokens: u32,
    repetition_penalty: f64,
    profanity_check: bool,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// The answer text of a completion, or why there is none.
fn completion_text(response: ChatResponse) -> Result<String, GenerationError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::InvalidResponse("no choices in completion".to_string()))?;
    if choice.finish_reason.as_deref() == Some("blacklist") {
        warn!("text model refused the prompt");
        return Err(GenerationError::ModelRefused);
    }
    Ok(choice.message.content)
}

pub struct GigaChatClient {
    http: reqwest::blocking::Client,
    settings: GigaChatSettings,
    credentials: GigaChatCredentials,
    token: Mutex<Option<TokenCache>>,
}

impl GigaChatClient {
    pub fn new(
        settings: GigaChatSettings,
        credentials: GigaChatCredentials,
    ) -> Result<Self, GenerationError> {
        let http = reqwest::blocking::Client::builder().build()?;
        Ok(Self {
            http,
            settings,
            credentials,
            token: Mutex::new(None),
        })
    }

    /// A token valid for at least a few more seconds, refreshed on demand.
    pub fn valid_token(&self) -> Result<String, GenerationError> {
        let mut cache = self.token.lock();
        let now = Utc::now().timestamp();
        if let Some(cached) = cache.as_ref()
            && cached.is_valid_at(now)
        {
            return Ok(cached.token.clone());
        }

        let fresh = self.request_token()?;
        let token = fresh.token.clone();
        *cache = Some(fresh);
        Ok(token)
    }

    fn request_token(&self) -> Result<TokenCache, GenerationError> {
        debug!(url = %self.settings.token_url, "requesting access token");
        let mut request = self
            .http
            .post(&self.settings.token_url)
            .timeout(Duration::from_secs(self.settings.token_timeout_secs))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("Accept", "application/json")
            .header("RqUID", generate_request_id())
            .header(
                "Authorization",
                format!("Basic {}", self.credentials.auth_token.trim()),
            )
            .body(format!("scope={}", self.settings.scope));
        if let Some(cookie) = &self.credentials.cookie {
            request = request.header("Cookie", cookie.as_str());
        }

        let response = request.send()?.error_for_status()?;
        let token: TokenResponse = response.json()?;
        Ok(token.into())
    }
}

impl TextGenerator for GigaChatClient {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let token = self.valid_token()?;
        let request = ChatRequest {
            model: &self.settings.model,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
            temperature: self.settings.temperature,
            top_p: self.settings.top_p,
            n: 1,
            stream: false,
            max_tokens: self.settings.max_tokens,
            repetition_penalty: self.settings.repetition_penalty,
            profanity_check: self.settings.profanity_check,
        };

        debug!(model = %self.settings.model, prompt_len = prompt.len(), "requesting completion");
        let response = self
            .http
            .post(&self.settings.completion_url)
            .timeout(Duration::from_secs(self.settings.completion_timeout_secs))
            .header("Accept", "application/json")
            .bearer_auth(token)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::ModelUnavailable(format!(
                "completion request failed with {}: {}",
                status, body
            )));
        }
        completion_text(response.json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<String, GenerationError> {
        completion_text(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_token_refresh_margin() {
        let cache = TokenCache {
            token: "t".to_string(),
            expires_at: 1_000,
        };
        assert!(cache.is_valid_at(990));
        assert!(!cache.is_valid_at(995));
        assert!(!cache.is_valid_at(2_000));
    }

    #[test]
    fn test_token_expiry_in_milliseconds() {
        let cache = TokenCache::from(TokenResponse {
            tok: "t".to_string(),
            exp: 1_700_000_000_000,
        });
        assert_eq!(cache.expires_at, 1_700_000_000);
        let cache = TokenCache::from(TokenResponse {
            tok: "t".to_string(),
            exp: 1_700_000_000,
        });
        assert_eq!(cache.expires_at, 1_700_000_000);
    }

    #[test]
    fn test_completion_text() {
        let text = parse(r#"{"choices": [{"message": {"content": "Bees"}, "finish_reason": "stop"}]}"#);
        assert_eq!(text.unwrap(), "Bees");
    }

    #[test]
    fn test_blacklist_is_refusal() {
        let text = parse(r#"{"choices": [{"message": {"content": "..."}, "finish_reason": "blacklist"}]}"#);
        assert!(matches!(text, Err(GenerationError::ModelRefused)));
    }

    #[test]
    fn test_no_choices() {
        assert!(matches!(
            parse(r#"{"choices": []}"#),
            Err(GenerationError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: "GigaChat-Pro",
            messages: [Message {
                role: "user",
                content: "hi",
            }],
            temperature: 0.87,
            top_p: 0.47,
            n: 1,
            stream: false,
            max_tokens: 2048,
            repetition_penalty: 1.07,
            profanity_check: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "GigaChat-Pro");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 2048);
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let credentials = GigaChatCredentials {
            auth_token: "secret".to_string(),
            cookie: Some("session".to_string()),
        };
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("secret"));
        assert!(!debug.contains("session"));
    }
}
