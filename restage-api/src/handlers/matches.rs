use actix_web::{web, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use restage_engine::normalizer;
use shared_types::{ContactsResponse, MatchGroupsResponse};

use crate::database::{contacts as contacts_db, match_groups as match_groups_db, Database};

/// Current classification result, straight from the store. Group keys are
/// synthesized per fetch and carry no meaning across calls.
pub async fn list_match_groups(db: web::Data<Arc<Database>>) -> ActixResult<HttpResponse> {
    let groups = match_groups_db::fetch_match_groups(db.async_connection.clone())
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(MatchGroupsResponse {
        groups: normalizer::group_views(&groups),
    }))
}

pub async fn list_contacts(db: web::Data<Arc<Database>>) -> ActixResult<HttpResponse> {
    let contacts = contacts_db::list_contacts(db.async_connection.clone())
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    let contacts = contacts
        .iter()
        .map(|c| normalizer::contact_view(c, None))
        .collect();
    Ok(HttpResponse::Ok().json(ContactsResponse { contacts }))
}
