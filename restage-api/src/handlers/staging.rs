use actix_web::{web, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use restage_engine::{engine::status_count_rows, normalizer};
use shared_types::{CreateStagingRequest, StagingRecordsResponse, StatusCountsResponse};

use crate::database::{staging as staging_db, Database};
use crate::handlers::SharedEngine;

/// Unfiltered staging record viewer.
pub async fn list_staging_records(engine: web::Data<SharedEngine>) -> ActixResult<HttpResponse> {
    let engine = engine.lock().await;
    let records = engine
        .staging_overview()
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(StagingRecordsResponse { records }))
}

/// Status summary card.
pub async fn status_counts(db: web::Data<Arc<Database>>) -> ActixResult<HttpResponse> {
    let counts = staging_db::status_counts(db.async_connection.clone())
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(StatusCountsResponse {
        counts: status_count_rows(&counts),
    }))
}

/// Ingestion intake: upstream pushes new unverified records through here.
pub async fn create_staging_record(
    db: web::Data<Arc<Database>>,
    request: web::Json<CreateStagingRequest>,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();
    let record = staging_db::insert_staging_record(db.async_connection.clone(), &request)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Created().json(normalizer::staging_view(&record)))
}
