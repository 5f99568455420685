use shared::{AppError, Result, ServiceClient};
use tracing::{debug, error, info};

use super::models::{UserIdentity, UserSyncRequest, UserSyncResponse};

pub const USER_AUTOSYNC_ENDPOINT: &str = "/entity/game/user/autosync";

/// Maps a caller-side identity to the provider's entity identifier.
#[derive(Clone)]
pub struct EntityResolver {
    client: ServiceClient,
}

impl EntityResolver {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    /// Syncs `identity` with the provider and returns its entity id, whether
    /// the provider just created the entity or already had it.
    pub async fn resolve_user_entity(&self, identity: &UserIdentity) -> Result<String> {
        debug!(third_party_id = %identity.third_party_id, "Syncing user with provider");

        let request = UserSyncRequest { users: [identity] };
        let body = self
            .client
            .post(USER_AUTOSYNC_ENDPOINT, &request)
            .await?
            .into_success_body("user_autosync")?;

        let response: UserSyncResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Autosync response could not be decoded");
            AppError::resolution("unexpected autosync response")
        })?;

        let record = response.find(&identity.third_party_id).ok_or_else(|| {
            error!(
                third_party_id = %identity.third_party_id,
                created = response.entities_created.len(),
                existing = response.entities_existing.len(),
                "User not present in autosync result"
            );
            AppError::resolution(format!(
                "no entity returned for third_party_id {}",
                identity.third_party_id
            ))
        })?;

        let entity_id = record.entity_id.clone().ok_or_else(|| {
            AppError::resolution(format!(
                "entity record for third_party_id {} has no entity_id",
                identity.third_party_id
            ))
        })?;

        info!(entity_id = %entity_id, "Resolved user entity");
        Ok(entity_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn identity() -> UserIdentity {
        UserIdentity {
            third_party_id: "player-42".to_string(),
            first_name: "Demo".to_string(),
            last_name: "Player".to_string(),
            email: "demo@example.com".to_string(),
            phone: "+10000000000".to_string(),
        }
    }

    fn resolver_for(server: &MockServer) -> EntityResolver {
        let client = ServiceClient::new(server.uri(), "sk_test", Duration::from_secs(5), 0).unwrap();
        EntityResolver::new(client)
    }

    async fn mount_sync_response(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(USER_AUTOSYNC_ENDPOINT))
            .and(header("x-api-key", "sk_test"))
            .respond_with(template)
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn sends_single_user_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(USER_AUTOSYNC_ENDPOINT))
            .and(body_json(json!({
                "users": [{
                    "third_party_id": "player-42",
                    "first_name": "Demo",
                    "last_name": "Player",
                    "email": "demo@example.com",
                    "phone": "+10000000000"
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entities_created": [{ "third_party_id": "player-42", "entity_id": "E1" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let entity_id = resolver_for(&server).resolve_user_entity(&identity()).await.unwrap();
        assert_eq!(entity_id, "E1");
    }

    #[tokio::test]
    async fn resolves_from_existing_entities() {
        let server = MockServer::start().await;
        mount_sync_response(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "entities_created": [],
                "entities_existing": [{ "third_party_id": "player-42", "entity_id": "E7" }]
            })),
        )
        .await;

        let entity_id = resolver_for(&server).resolve_user_entity(&identity()).await.unwrap();
        assert_eq!(entity_id, "E7");
    }

    #[tokio::test]
    async fn resolves_from_created_entities_without_existing_list() {
        let server = MockServer::start().await;
        mount_sync_response(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "entities_created": [
                    { "third_party_id": "someone-else", "entity_id": "E0" },
                    { "third_party_id": "player-42", "entity_id": "E3" }
                ]
            })),
        )
        .await;

        let entity_id = resolver_for(&server).resolve_user_entity(&identity()).await.unwrap();
        assert_eq!(entity_id, "E3");
    }

    #[tokio::test]
    async fn unknown_user_is_a_resolution_error() {
        let server = MockServer::start().await;
        mount_sync_response(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "entities_created": [{ "third_party_id": "someone-else", "entity_id": "E0" }],
                "entities_existing": []
            })),
        )
        .await;

        let err = resolver_for(&server).resolve_user_entity(&identity()).await.unwrap_err();
        assert!(matches!(err, AppError::Resolution { .. }));
    }

    #[tokio::test]
    async fn record_without_entity_id_is_a_resolution_error() {
        let server = MockServer::start().await;
        mount_sync_response(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "entities_existing": [{ "third_party_id": "player-42" }]
            })),
        )
        .await;

        let err = resolver_for(&server).resolve_user_entity(&identity()).await.unwrap_err();
        assert!(matches!(err, AppError::Resolution { .. }));
    }

    #[tokio::test]
    async fn undecodable_body_is_a_resolution_error() {
        let server = MockServer::start().await;
        mount_sync_response(&server, ResponseTemplate::new(200).set_body_string("ok")).await;

        let err = resolver_for(&server).resolve_user_entity(&identity()).await.unwrap_err();
        assert!(matches!(err, AppError::Resolution { .. }));
    }

    #[tokio::test]
    async fn mistyped_sync_body_is_not_echoed_in_the_error() {
        let server = MockServer::start().await;
        mount_sync_response(
            &server,
            ResponseTemplate::new(200)
                .set_body_json(json!({ "entities_created": "internal-shard-db7 token=abc123" })),
        )
        .await;

        let err = resolver_for(&server).resolve_user_entity(&identity()).await.unwrap_err();
        let rendered = err.to_string();
        assert!(matches!(err, AppError::Resolution { .. }));
        assert!(!rendered.contains("internal-shard-db7"));
        assert!(!rendered.contains("abc123"));
    }

    #[tokio::test]
    async fn rejected_sync_is_a_provider_error() {
        let server = MockServer::start().await;
        mount_sync_response(
            &server,
            ResponseTemplate::new(401).set_body_json(json!({ "message": "invalid api key" })),
        )
        .await;

        match resolver_for(&server).resolve_user_entity(&identity()).await.unwrap_err() {
            AppError::Provider { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid api key");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
