use log::debug;
use rocket::{
    serde::json::{Error as JsonError, Json},
    Route, State,
};

use super::json_body;
use crate::{
    error::Result,
    logging::RequestId,
    model::vote::{VoteAccepted, VoteRequest},
    registry::RegistryService,
};

pub fn routes() -> Vec<Route> {
    routes![cast_vote]
}

/// Cast a vote with a voter token. Failures carry a human-readable reason.
#[post("/votes", data = "<request>", format = "json")]
async fn cast_vote(
    request_id: &RequestId,
    request: std::result::Result<Json<VoteRequest>, JsonError<'_>>,
    registry: &State<RegistryService>,
) -> Result<Json<VoteAccepted>> {
    let request = json_body(request)?;
    debug!("req{request_id} vote for candidate {}", request.candidate_id);
    registry.vote(&request.token, request.candidate_id).await?;
    Ok(Json(VoteAccepted::default()))
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::{Client, LocalResponse},
        serde::json::serde_json::{json, Value},
    };

    use crate::model::{
        candidate::{CandidateId, CandidateSpec},
        session::AdminSession,
        token::TokenSpec,
    };

    use super::*;

    async fn vote<'c>(client: &'c Client, token: &str, candidate: u32) -> LocalResponse<'c> {
        client
            .post(uri!(cast_vote))
            .header(ContentType::JSON)
            .body(json!({ "token": token, "candidateId": candidate }).to_string())
            .dispatch()
            .await
    }

    async fn error_of(response: LocalResponse<'_>) -> String {
        let body: Value = response.into_json().await.unwrap();
        body["error"].as_str().unwrap().to_string()
    }

    async fn seed(registry: &RegistryService) {
        let session = AdminSession::example();
        let admin = registry.as_admin(&session).unwrap();
        admin.add_candidate(CandidateSpec::example()).await.unwrap();
        admin.register_token(TokenSpec::example()).await.unwrap();
    }

    #[registry_test]
    async fn vote_once(client: Client, registry: RegistryService) {
        seed(&registry).await;

        let response = vote(&client, "tok-1", 1).await;
        assert_eq!(Status::Ok, response.status());
        let accepted: VoteAccepted = response.into_json().await.unwrap();
        assert_eq!(accepted, VoteAccepted::default());

        let results = registry.get_results().await.unwrap();
        assert_eq!(results[0].name, "Alice");
        assert_eq!(results[0].vote_count, 1);

        let response = vote(&client, "tok-1", 1).await;
        assert_eq!(Status::Conflict, response.status());
        assert_eq!(error_of(response).await, "Token has already been used to vote");
    }

    #[registry_test]
    async fn vote_for_removed_candidate_keeps_token(client: Client, registry: RegistryService) {
        seed(&registry).await;
        let session = AdminSession::example();
        let admin = registry.as_admin(&session).unwrap();
        admin.register_token(TokenSpec::example2()).await.unwrap();
        admin.add_candidate(CandidateSpec::example2()).await.unwrap();
        admin.remove_candidate(CandidateId(1)).await.unwrap();

        let response = vote(&client, "tok-2", 1).await;
        assert_eq!(Status::UnprocessableEntity, response.status());
        assert_eq!(error_of(response).await, "Candidate 1 is not active");

        let response = vote(&client, "tok-2", 2).await;
        assert_eq!(Status::Ok, response.status());
    }

    #[registry_test]
    async fn unknown_token(client: Client, registry: RegistryService) {
        seed(&registry).await;

        let response = vote(&client, "forged", 1).await;
        assert_eq!(Status::NotFound, response.status());
        assert_eq!(error_of(response).await, "Token is not registered");

        let response = vote(&client, "", 1).await;
        assert_eq!(Status::BadRequest, response.status());
    }

    #[registry_test]
    async fn malformed_submission(client: Client, registry: RegistryService) {
        seed(&registry).await;

        for body in [
            json!({ "token": "tok-1" }).to_string(),
            json!({ "token": "tok-1", "candidateId": -1 }).to_string(),
            json!({ "token": "tok-1", "candidateId": "one" }).to_string(),
            "{not json".to_string(),
        ] {
            let response = client
                .post(uri!(cast_vote))
                .header(ContentType::JSON)
                .body(body)
                .dispatch()
                .await;
            assert_eq!(Status::BadRequest, response.status());
            assert!(error_of(response).await.starts_with("Invalid input"));
        }

        // None of the rejected submissions touched the token.
        let response = vote(&client, "tok-1", 1).await;
        assert_eq!(Status::Ok, response.status());
    }
}
