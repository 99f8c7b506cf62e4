//! v2 routes: history-aware reads, append-only writes.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use super::{run_blocking, ApiError, VersionsQuery};
use crate::error::RecordError;
use crate::record::{RecordId, Update};
use crate::service::RecordService;
use crate::store::VersionStore;

#[derive(Debug, Deserialize)]
struct VersionsParams {
    versions: Option<String>,
}

pub(super) fn routes<S: VersionStore + 'static>(service: Arc<RecordService<S>>) -> Router {
    Router::new()
        .route(
            "/records/:id",
            get(get_records::<S>).post(post_record::<S>),
        )
        .with_state(service)
}

/// `GET /records/:id?versions=...`
///
/// `latest` answers with a single record (`404` if absent); `all` and
/// version lists answer with an array.
async fn get_records<S: VersionStore + 'static>(
    State(service): State<Arc<RecordService<S>>>,
    Path(id): Path<String>,
    params: Result<Query<VersionsParams>, QueryRejection>,
) -> Response {
    let id = match RecordId::parse(&id) {
        Ok(id) => id,
        Err(e) => return ApiError::from(e).into_response(),
    };
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            let err = RecordError::InvalidVersions(rejection.body_text());
            return ApiError::from(err).into_response();
        }
    };
    let query = match VersionsQuery::from_param(params.versions.as_deref()) {
        Ok(query) => query,
        Err(e) => return ApiError::from(e).into_response(),
    };

    let result = match query {
        VersionsQuery::Latest => {
            run_blocking(service, move |service| service.get_record(id))
                .await
                .map(|record| Json(record).into_response())
        }
        VersionsQuery::All => {
            run_blocking(service, move |service| service.get_all_records(id))
                .await
                .map(|records| Json(records).into_response())
        }
        VersionsQuery::List(versions) => run_blocking(service, move |service| {
            service.get_records_with_versions(id, &versions)
        })
        .await
        .map(|records| Json(records).into_response()),
    };

    result.unwrap_or_else(|e| ApiError::from(e).into_response())
}

/// `POST /records/:id`: append a new version, creating the record if needed.
async fn post_record<S: VersionStore + 'static>(
    State(service): State<Arc<RecordService<S>>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    let result: Result<_, RecordError> = async {
        let id = RecordId::parse(&id)?;
        let update = Update::from_json(&body)?;
        run_blocking(service, move |service| service.apply_update(id, &update)).await
    }
    .await;

    match result {
        Ok(record) => Json(record).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
