use rocket::{serde::json::Json, Route, State};

use crate::{error::Result, model::candidate::CandidateDesc, registry::RegistryService};

pub fn routes() -> Vec<Route> {
    routes![candidates]
}

/// Candidates a voter may choose from, in ascending ID order.
#[get("/candidates")]
async fn candidates(registry: &State<RegistryService>) -> Result<Json<Vec<CandidateDesc>>> {
    Ok(Json(registry.list_candidates().await?))
}
