use rocket::{
    http::Status,
    serde::json::{Error as JsonError, Json},
    Route, State,
};

use super::json_body;
use crate::{
    error::Result,
    model::{
        candidate::{Candidate, CandidateId, CandidateSpec, CandidateTally},
        session::AdminSession,
        token::TokenSpec,
        vote::{VoteRecord, VoterActivity},
    },
    registry::RegistryService,
};

pub fn routes() -> Vec<Route> {
    routes![
        add_candidate,
        remove_candidate,
        register_token,
        results,
        activity,
        ledger,
    ]
}

#[post("/candidates", data = "<spec>", format = "json")]
async fn add_candidate(
    session: AdminSession,
    spec: std::result::Result<Json<CandidateSpec>, JsonError<'_>>,
    registry: &State<RegistryService>,
) -> Result<(Status, Json<Candidate>)> {
    let candidate = registry
        .as_admin(&session)?
        .add_candidate(json_body(spec)?)
        .await?;
    Ok((Status::Created, Json(candidate)))
}

#[delete("/candidates/<candidate_id>")]
async fn remove_candidate(
    session: AdminSession,
    candidate_id: CandidateId,
    registry: &State<RegistryService>,
) -> Result<()> {
    registry
        .as_admin(&session)?
        .remove_candidate(candidate_id)
        .await
}

#[post("/tokens", data = "<spec>", format = "json")]
async fn register_token(
    session: AdminSession,
    spec: std::result::Result<Json<TokenSpec>, JsonError<'_>>,
    registry: &State<RegistryService>,
) -> Result<Status> {
    registry
        .as_admin(&session)?
        .register_token(json_body(spec)?)
        .await?;
    Ok(Status::Created)
}

#[get("/results")]
async fn results(
    session: AdminSession,
    registry: &State<RegistryService>,
) -> Result<Json<Vec<CandidateTally>>> {
    let results = registry.as_admin(&session)?.results().await?;
    Ok(Json(results))
}

#[get("/activity")]
async fn activity(
    session: AdminSession,
    registry: &State<RegistryService>,
) -> Result<Json<Vec<VoterActivity>>> {
    let activity = registry.as_admin(&session)?.voter_activity().await?;
    Ok(Json(activity))
}

#[get("/ledger")]
async fn ledger(
    session: AdminSession,
    registry: &State<RegistryService>,
) -> Result<Json<Vec<VoteRecord>>> {
    let ledger = registry.as_admin(&session)?.ledger().await?;
    Ok(Json(ledger))
}
