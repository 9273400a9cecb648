// ── Socratic Engine: Session Provisioner ───────────────────────────────────
// Guarantees that before any chat message is exchanged, both a remote user
// record and a replica exist for the current user and subject, and resolves
// the replica uuid used by subsequent chat calls.
//
// Provisioning steps:
//   1. memoized short-circuit on an already-resolved uuid
//   2. org-scoped user lookup (404 is expected, not an error)
//   3. idempotent user creation with best-effort profile fields
//   4. rescope to a user-scoped client (replica operations need it)
//   5. replica selection by slug mode
//   6. replica creation if nothing matched
//   7. cache the uuid for the rest of the session
//
// The memoized uuid is per-provisioner state, cleared only by dropping the
// provisioner. There is no cross-process locking: two concurrent sessions can
// both race steps 2-6, and the remote slug uniqueness constraint is the only
// backstop, surfaced to the loser as `SlugConflict`.

use chrono::Utc;
use log::{debug, info};
use parking_lot::Mutex;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::atoms::constants::{REPLICA_LLM_MODEL, REPLICA_MEMORY_MODE};
use crate::atoms::error::EngineResult;
use crate::atoms::types::{LocalUser, SlugMode};
use crate::engine::catalog::Subject;
use crate::engine::sensay::{CreateReplicaRequest, CreateUserRequest, LlmSpec, SensayClient};

pub struct SessionProvisioner {
    client: SensayClient,
    mode: SlugMode,
    cached_uuid: Mutex<Option<String>>,
}

impl SessionProvisioner {
    pub fn new(client: SensayClient, mode: SlugMode) -> Self {
        SessionProvisioner {
            client,
            mode,
            cached_uuid: Mutex::new(None),
        }
    }

    /// Seed an already-known uuid, skipping the whole remote routine on the
    /// first `ensure_replica` call.
    pub fn with_known_uuid(client: SensayClient, mode: SlugMode, uuid: impl Into<String>) -> Self {
        SessionProvisioner {
            client,
            mode,
            cached_uuid: Mutex::new(Some(uuid.into())),
        }
    }

    /// Resolve the replica uuid for `(user, subject)`, creating the remote
    /// user record and the replica as needed. Idempotent within a session:
    /// repeated calls return the memoized uuid without remote traffic.
    pub async fn ensure_replica(&self, user: &LocalUser, subject: &Subject) -> EngineResult<String> {
        if let Some(uuid) = self.cached_uuid.lock().clone() {
            debug!("[session] reusing resolved replica uuid {uuid}");
            return Ok(uuid);
        }

        // Org scope only: the user may not exist yet.
        let org = self.client.org_scoped();
        let existing = org.get_user(&user.id).await?;
        if existing.is_none() {
            info!("[session] user {} not known to the service, creating", user.id);
            org.create_user(&CreateUserRequest {
                id: user.id.clone(),
                email: Some(user.email_or_placeholder()),
                name: Some(user.name_or_default()),
            })
            .await?;
        }

        // Replica operations require the user-scoped credential.
        let scoped = self.client.user_scoped(user.id.as_str());

        let replicas = scoped.list_replicas().await?;
        let found = match &self.mode {
            SlugMode::Deterministic => replicas
                .iter()
                .find(|r| r.slug == subject.id)
                .map(|r| r.uuid.clone()),
            // Demo mode takes whatever the service listed first. The order is
            // the service's, and the pick may not match the intended subject.
            // That looseness is documented behavior, not a matching bug.
            SlugMode::Demo { .. } => replicas.first().map(|r| r.uuid.clone()),
        };

        let uuid = match found {
            Some(uuid) => {
                info!("[session] found existing replica {uuid} for {}", subject.id);
                uuid
            }
            None => {
                let slug = match &self.mode {
                    SlugMode::Deterministic => subject.id.to_string(),
                    SlugMode::Demo { base } => generate_demo_slug(base),
                };
                info!("[session] no replica matched, creating slug={slug}");
                scoped
                    .create_replica(&CreateReplicaRequest {
                        name: subject.teacher.to_string(),
                        short_description: format!(
                            "{} teacher using the Socratic method",
                            subject.name
                        ),
                        greeting: subject.greeting.to_string(),
                        slug,
                        owner_id: user.id.clone(),
                        llm: LlmSpec {
                            model: REPLICA_LLM_MODEL.to_string(),
                            memory_mode: REPLICA_MEMORY_MODE.to_string(),
                            system_message: subject.system_message.to_string(),
                        },
                    })
                    .await?
            }
        };

        *self.cached_uuid.lock() = Some(uuid.clone());
        Ok(uuid)
    }
}

/// Demo slugs combine the base name, a millisecond timestamp, and a short
/// random suffix so repeated demo runs never collide on the service.
fn generate_demo_slug(base: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();
    format!("{base}-{}-{suffix}", Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn student() -> LocalUser {
        LocalUser {
            id: "u1".into(),
            email: Some("u1@school.edu".into()),
            display_name: Some("Student One".into()),
        }
    }

    fn philosophy() -> &'static Subject {
        crate::engine::catalog::find("philosophy").unwrap()
    }

    fn provisioner(server: &MockServer, mode: SlugMode) -> SessionProvisioner {
        SessionProvisioner::new(SensayClient::with_base_url("secret", server.uri()), mode)
    }

    /// Fresh user, deterministic mode: the full call sequence runs once and
    /// the resulting transcript-facing uuid comes from creation.
    #[tokio::test]
    async fn end_to_end_fresh_user_creates_everything() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/users/u1"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/users"))
            .and(body_partial_json(serde_json::json!({"id": "u1"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": "u1"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/replicas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/replicas"))
            .and(body_partial_json(
                serde_json::json!({"slug": "philosophy", "ownerID": "u1"}),
            ))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({"uuid": "r-123"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let p = provisioner(&server, SlugMode::Deterministic);
        let uuid = p.ensure_replica(&student(), philosophy()).await.unwrap();
        assert_eq!(uuid, "r-123");
    }

    /// Two sequential calls resolve the same uuid and hit the service once.
    /// The `expect(1)` mounts make wiremock fail the test on a second round.
    #[tokio::test]
    async fn provisioning_is_idempotent_within_a_session() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/users/u1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "u1"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/replicas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/replicas"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({"uuid": "r-9"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let p = provisioner(&server, SlugMode::Deterministic);
        let first = p.ensure_replica(&student(), philosophy()).await.unwrap();
        let second = p.ensure_replica(&student(), philosophy()).await.unwrap();
        assert_eq!(first, "r-9");
        assert_eq!(first, second);
    }

    /// An existing replica with the subject's slug is reused, never recreated.
    #[tokio::test]
    async fn deterministic_mode_reuses_matching_slug() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/users/u1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "u1"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/replicas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {"uuid": "r-lit", "slug": "literature", "name": "Prof. Wilson"},
                    {"uuid": "r-phi", "slug": "philosophy", "name": "Dr. Harper"}
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/replicas"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let p = provisioner(&server, SlugMode::Deterministic);
        let uuid = p.ensure_replica(&student(), philosophy()).await.unwrap();
        assert_eq!(uuid, "r-phi");
    }

    /// Demo mode takes the first listed replica regardless of slug.
    #[tokio::test]
    async fn demo_mode_takes_first_listed_replica() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/users/u1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "u1"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/replicas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {"uuid": "r-any", "slug": "sample-123-abc", "name": "Sample"},
                    {"uuid": "r-other", "slug": "philosophy", "name": "Dr. Harper"}
                ]
            })))
            .mount(&server)
            .await;

        let p = provisioner(&server, SlugMode::Demo { base: "sample".into() });
        let uuid = p.ensure_replica(&student(), philosophy()).await.unwrap();
        assert_eq!(uuid, "r-any");
    }

    /// A conflict in deterministic mode surfaces as `SlugConflict` naming the
    /// attempted slug. No second creation attempt with a generated name is
    /// issued (the `expect(1)` on the POST mount enforces it).
    #[tokio::test]
    async fn conflict_surfaces_and_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/users/u1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "u1"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/replicas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/replicas"))
            .respond_with(ResponseTemplate::new(409))
            .expect(1)
            .mount(&server)
            .await;

        let p = provisioner(&server, SlugMode::Deterministic);
        let err = p.ensure_replica(&student(), philosophy()).await.unwrap_err();
        match err {
            crate::atoms::error::EngineError::SlugConflict { slug } => {
                assert_eq!(slug, "philosophy")
            }
            other => panic!("expected SlugConflict, got {other:?}"),
        }
    }

    /// A pre-seeded uuid short-circuits the entire routine: zero requests.
    #[tokio::test]
    async fn known_uuid_short_circuits_remote_calls() {
        let server = MockServer::start().await;

        let p = SessionProvisioner::with_known_uuid(
            SensayClient::with_base_url("secret", server.uri()),
            SlugMode::Deterministic,
            "r-known",
        );
        let uuid = p.ensure_replica(&student(), philosophy()).await.unwrap();
        assert_eq!(uuid, "r-known");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[test]
    fn demo_slugs_are_unique_across_runs() {
        let a = generate_demo_slug("sample");
        let b = generate_demo_slug("sample");
        assert!(a.starts_with("sample-"));
        assert_ne!(a, b);
    }
}
