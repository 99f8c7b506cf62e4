//! v1 routes: latest-only reads, create-or-update writes.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use super::{run_blocking, ApiError};
use crate::error::RecordError;
use crate::record::{Record, RecordId, Update};
use crate::service::RecordService;
use crate::store::VersionStore;

pub(super) fn routes<S: VersionStore + 'static>(service: Arc<RecordService<S>>) -> Router {
    Router::new()
        .route(
            "/records/:id",
            get(get_record::<S>).post(post_record::<S>),
        )
        .with_state(service)
}

/// `GET /records/:id`: the latest version.
async fn get_record<S: VersionStore + 'static>(
    State(service): State<Arc<RecordService<S>>>,
    Path(id): Path<String>,
) -> Response {
    let result: Result<_, RecordError> = async {
        let id = RecordId::parse(&id)?;
        run_blocking(service, move |service| service.get_record(id)).await
    }
    .await;

    match result {
        Ok(record) => Json(record).into_response(),
        Err(e) => ApiError::legacy(e).into_response(),
    }
}

/// `POST /records/:id`: update the record if present, create it otherwise.
async fn post_record<S: VersionStore + 'static>(
    State(service): State<Arc<RecordService<S>>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    let result: Result<_, RecordError> = async {
        let id = RecordId::parse(&id)?;
        let update = Update::from_json(&body)?;
        run_blocking(service, move |service| create_or_update(service, id, &update)).await
    }
    .await;

    match result {
        Ok(record) => Json(record).into_response(),
        Err(e) => ApiError::legacy(e).into_response(),
    }
}

fn create_or_update<S: VersionStore>(
    service: &RecordService<S>,
    id: RecordId,
    update: &Update,
) -> Result<crate::record::VersionedRecord, RecordError> {
    match service.update_record(id, update) {
        Err(RecordError::NotFound(_)) => {}
        other => return other,
    }
    match service.create_record(Record::new(id, update.upserts())) {
        // created concurrently between the two calls
        Err(RecordError::AlreadyExists(_)) => service.update_record(id, update),
        other => other,
    }
}
