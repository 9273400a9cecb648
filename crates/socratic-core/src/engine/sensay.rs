// ── Socratic Engine: Sensay Client ─────────────────────────────────────────
// Thin typed client for the hosted replica service.
//
// The service distinguishes two credential scopes:
//   • organization scope — `X-ORGANIZATION-SECRET` only; enough to look up
//     and create user records, but not to touch any user's replicas.
//   • user scope — additionally `X-USER-ID`; required for replica listing,
//     creation, and chat completions.
//
// The scope transition is modeled as two distinct types so provisioning code
// cannot accidentally call a per-user operation with an org-only credential.
//
// The organization secret is never logged.

use log::{debug, info};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::atoms::constants::{CHAT_SOURCE, SENSAY_API_VERSION, SENSAY_BASE_URL};
use crate::atoms::error::{EngineError, EngineResult};
use crate::atoms::types::ReplicaDescriptor;

// ── Wire types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateUserRequest {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LlmSpec {
    pub model: String,
    #[serde(rename = "memoryMode")]
    pub memory_mode: String,
    #[serde(rename = "systemMessage")]
    pub system_message: String,
}

#[derive(Debug, Serialize)]
pub struct CreateReplicaRequest {
    pub name: String,
    #[serde(rename = "shortDescription")]
    pub short_description: String,
    pub greeting: String,
    pub slug: String,
    #[serde(rename = "ownerID")]
    pub owner_id: String,
    pub llm: LlmSpec,
}

#[derive(Debug, Deserialize)]
struct ReplicaListResponse {
    #[serde(default)]
    items: Option<Vec<ReplicaDescriptor>>,
}

#[derive(Debug, Deserialize)]
struct CreateReplicaResponse {
    uuid: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    content: &'a str,
    source: &'a str,
    skip_chat_history: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    content: String,
}

// ── Error body unwrapping ──────────────────────────────────────────────────

/// Pull a human-readable message out of the service's error body.
/// Bodies arrive as `{"error": {"message": ...}}`, `{"error": "..."}`,
/// `{"message": "..."}`, or plain text.
pub(crate) fn extract_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
        {
            return msg.to_string();
        }
        if let Some(msg) = value.get("error").and_then(Value::as_str) {
            return msg.to_string();
        }
        if let Some(msg) = value.get("message").and_then(Value::as_str) {
            return msg.to_string();
        }
    }
    if body.trim().is_empty() {
        format!("API error ({})", status.as_u16())
    } else {
        format!("API error ({}): {}", status.as_u16(), body.trim())
    }
}

async fn classify_failure(resp: Response) -> EngineError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    EngineError::from_status(status.as_u16(), extract_api_error(status, &body))
}

// ── Base client ────────────────────────────────────────────────────────────

/// Credential holder and transport. Cheap to clone; scope-specific views are
/// derived from it.
#[derive(Clone)]
pub struct SensayClient {
    http: Client,
    base_url: String,
    org_secret: String,
}

impl SensayClient {
    pub fn new(org_secret: impl Into<String>) -> Self {
        Self::with_base_url(org_secret, SENSAY_BASE_URL)
    }

    pub fn with_base_url(org_secret: impl Into<String>, base_url: impl Into<String>) -> Self {
        SensayClient {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            org_secret: org_secret.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Organization-only view: user lookup and creation.
    pub fn org_scoped(&self) -> OrgScopedClient {
        OrgScopedClient { inner: self.clone() }
    }

    /// Per-user view: replica operations and chat completions.
    pub fn user_scoped(&self, user_id: impl Into<String>) -> UserScopedClient {
        UserScopedClient {
            inner: self.clone(),
            user_id: user_id.into(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header("X-ORGANIZATION-SECRET", &self.org_secret)
            .header("X-API-Version", SENSAY_API_VERSION)
    }
}

// ── Organization scope ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct OrgScopedClient {
    inner: SensayClient,
}

impl OrgScopedClient {
    /// Fetch a user record. A 404 is an expected outcome during
    /// provisioning, so it maps to `Ok(None)` rather than an error.
    pub async fn get_user(&self, id: &str) -> EngineResult<Option<RemoteUser>> {
        debug!("[sensay] GET /v1/users/{id}");
        let resp = self
            .inner
            .request(reqwest::Method::GET, &format!("/v1/users/{id}"))
            .send()
            .await?;

        match resp.status() {
            s if s.is_success() => Ok(Some(resp.json::<RemoteUser>().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(classify_failure(resp).await),
        }
    }

    /// Create a user record. Idempotent: a 409 means someone else won the
    /// creation race, which is success as far as provisioning is concerned.
    pub async fn create_user(&self, req: &CreateUserRequest) -> EngineResult<()> {
        info!("[sensay] creating user {}", req.id);
        let resp = self
            .inner
            .request(reqwest::Method::POST, "/v1/users")
            .json(req)
            .send()
            .await?;

        match resp.status() {
            s if s.is_success() => Ok(()),
            StatusCode::CONFLICT => {
                debug!("[sensay] user {} already exists, treating as created", req.id);
                Ok(())
            }
            _ => Err(classify_failure(resp).await),
        }
    }
}

// ── User scope ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct UserScopedClient {
    inner: SensayClient,
    user_id: String,
}

impl UserScopedClient {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.inner.request(method, path).header("X-USER-ID", &self.user_id)
    }

    /// List replicas visible to this user. Order is whatever the service
    /// returns; no client-side sort is applied.
    pub async fn list_replicas(&self) -> EngineResult<Vec<ReplicaDescriptor>> {
        debug!("[sensay] GET /v1/replicas for user {}", self.user_id);
        let resp = self.request(reqwest::Method::GET, "/v1/replicas").send().await?;

        if !resp.status().is_success() {
            return Err(classify_failure(resp).await);
        }
        let list = resp.json::<ReplicaListResponse>().await?;
        Ok(list.items.unwrap_or_default())
    }

    /// Create a replica. A 409 here is a slug collision, surfaced with the
    /// attempted slug in the error so the operator can choose another.
    pub async fn create_replica(&self, req: &CreateReplicaRequest) -> EngineResult<String> {
        info!("[sensay] creating replica slug={} owner={}", req.slug, req.owner_id);
        let resp = self
            .request(reqwest::Method::POST, "/v1/replicas")
            .json(req)
            .send()
            .await?;

        match resp.status() {
            s if s.is_success() => {
                let created = resp.json::<CreateReplicaResponse>().await?;
                info!("[sensay] created replica uuid={}", created.uuid);
                Ok(created.uuid)
            }
            StatusCode::CONFLICT => Err(EngineError::SlugConflict { slug: req.slug.clone() }),
            _ => Err(classify_failure(resp).await),
        }
    }

    /// One chat completion against a resolved replica. The remote service
    /// owns conversation memory, so only the newest utterance is sent.
    pub async fn chat_completion(&self, replica_uuid: &str, content: &str) -> EngineResult<String> {
        debug!("[sensay] chat completion for replica {replica_uuid}");
        let resp = self
            .request(
                reqwest::Method::POST,
                &format!("/v1/replicas/{replica_uuid}/chat/completions"),
            )
            .json(&ChatCompletionRequest {
                content,
                source: CHAT_SOURCE,
                skip_chat_history: false,
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(classify_failure(resp).await);
        }
        Ok(resp.json::<ChatCompletionResponse>().await?.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> SensayClient {
        SensayClient::with_base_url("test-secret", server.uri())
    }

    #[test]
    fn error_body_shapes_unwrap() {
        let s = StatusCode::BAD_REQUEST;
        assert_eq!(extract_api_error(s, r#"{"error":{"message":"nested"}}"#), "nested");
        assert_eq!(extract_api_error(s, r#"{"error":"flat"}"#), "flat");
        assert_eq!(extract_api_error(s, r#"{"message":"top"}"#), "top");
        assert_eq!(extract_api_error(s, "plain text"), "API error (400): plain text");
        assert_eq!(extract_api_error(s, ""), "API error (400)");
    }

    #[tokio::test]
    async fn get_user_not_found_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/users/u1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let user = client(&server).org_scoped().get_user("u1").await.unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn get_user_401_is_authentication_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/users/u1"))
            .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"error":"Unauthorized"}"#))
            .mount(&server)
            .await;

        let err = client(&server).org_scoped().get_user("u1").await.unwrap_err();
        assert!(matches!(err, EngineError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn create_user_conflict_is_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/users"))
            .respond_with(ResponseTemplate::new(409))
            .mount(&server)
            .await;

        let req = CreateUserRequest { id: "u1".into(), email: None, name: None };
        assert!(client(&server).org_scoped().create_user(&req).await.is_ok());
    }

    #[tokio::test]
    async fn replica_requests_carry_user_scope_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/replicas"))
            .and(header("X-ORGANIZATION-SECRET", "test-secret"))
            .and(header("X-USER-ID", "u1"))
            .and(header("X-API-Version", SENSAY_API_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"uuid": "r-1", "slug": "philosophy", "name": "Dr. Harper"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let replicas = client(&server).user_scoped("u1").list_replicas().await.unwrap();
        assert_eq!(replicas.len(), 1);
        assert_eq!(replicas[0].uuid, "r-1");
    }

    #[tokio::test]
    async fn create_replica_conflict_is_slug_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/replicas"))
            .respond_with(ResponseTemplate::new(409))
            .mount(&server)
            .await;

        let req = CreateReplicaRequest {
            name: "Dr. Harper".into(),
            short_description: "Philosophy teacher".into(),
            greeting: "Welcome".into(),
            slug: "philosophy".into(),
            owner_id: "u1".into(),
            llm: LlmSpec {
                model: "claude-3-7-sonnet-latest".into(),
                memory_mode: "prompt-caching".into(),
                system_message: "persona".into(),
            },
        };
        let err = client(&server).user_scoped("u1").create_replica(&req).await.unwrap_err();
        match err {
            EngineError::SlugConflict { slug } => assert_eq!(slug, "philosophy"),
            other => panic!("expected SlugConflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn chat_completion_returns_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/replicas/r-1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": "What do you mean by justice?"
            })))
            .mount(&server)
            .await;

        let reply = client(&server)
            .user_scoped("u1")
            .chat_completion("r-1", "What is justice?")
            .await
            .unwrap();
        assert_eq!(reply, "What do you mean by justice?");
    }

    #[tokio::test]
    async fn chat_completion_429_is_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/replicas/r-1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
            .mount(&server)
            .await;

        let err = client(&server)
            .user_scoped("u1")
            .chat_completion("r-1", "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::RateLimited));
    }
}
