use actix_web::{web, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tokio::sync::Mutex;

use restage_engine::{EngineError, ReviewEngine};
use shared_types::{DeleteRequest, ErrorResponse, FilterRequest, SelectionRequest};

use crate::store::SqliteRecordStore;

/// The single active review view. The mutex serializes actions so a refresh
/// never races ahead of the mutation that triggered it.
pub type SharedEngine = Arc<Mutex<ReviewEngine<SqliteRecordStore>>>;

fn error_response(err: EngineError) -> HttpResponse {
    match err {
        EngineError::Validation(message) => {
            HttpResponse::BadRequest().json(ErrorResponse { error: message })
        }
        EngineError::Remote(message) | EngineError::Refresh(message) => {
            HttpResponse::InternalServerError().json(ErrorResponse { error: message })
        }
    }
}

pub async fn get_state(engine: web::Data<SharedEngine>) -> ActixResult<HttpResponse> {
    let engine = engine.lock().await;
    Ok(HttpResponse::Ok().json(engine.state(Vec::new())))
}

pub async fn set_selection(
    engine: web::Data<SharedEngine>,
    request: web::Json<SelectionRequest>,
) -> ActixResult<HttpResponse> {
    let mut engine = engine.lock().await;
    engine.set_selection(request.into_inner().ids);
    Ok(HttpResponse::Ok().json(engine.state(Vec::new())))
}

pub async fn set_filter(
    engine: web::Data<SharedEngine>,
    request: web::Json<FilterRequest>,
) -> ActixResult<HttpResponse> {
    let mut engine = engine.lock().await;
    engine.set_status_filter(request.into_inner().status);
    Ok(HttpResponse::Ok().json(engine.state(Vec::new())))
}

pub async fn promote(engine: web::Data<SharedEngine>) -> ActixResult<HttpResponse> {
    let mut engine = engine.lock().await;
    match engine.promote_selected().await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(engine.state(outcome.notifications))),
        Err(e) => Ok(error_response(e)),
    }
}

pub async fn delete(
    engine: web::Data<SharedEngine>,
    request: web::Json<DeleteRequest>,
) -> ActixResult<HttpResponse> {
    let mut engine = engine.lock().await;
    match engine.delete_selected(request.confirmed).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(engine.state(outcome.notifications))),
        Err(e) => Ok(error_response(e)),
    }
}

pub async fn reject(engine: web::Data<SharedEngine>) -> ActixResult<HttpResponse> {
    let mut engine = engine.lock().await;
    match engine.reject_selected().await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(engine.state(outcome.notifications))),
        Err(e) => Ok(error_response(e)),
    }
}

pub async fn refresh(engine: web::Data<SharedEngine>) -> ActixResult<HttpResponse> {
    let mut engine = engine.lock().await;
    match engine.refresh().await {
        Ok(()) => Ok(HttpResponse::Ok().json(engine.state(Vec::new()))),
        Err(e) => Ok(error_response(e)),
    }
}
