//! Job submission, query and deletion endpoints.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::domains::scrape_jobs::{CreateJobRequest, CreateJobResponse, ScrapeJob};
use crate::server::app::AxumAppState;
use crate::server::error::{ApiError, ApiResult};

/// Unknown and malformed ids are both "not found".
fn parse_job_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound)
}

/// `POST /api/jobs`
pub async fn create_job_handler(
    Extension(state): Extension<AxumAppState>,
    payload: Result<Json<CreateJobRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreateJobResponse>)> {
    let Json(request) = payload?;
    let tasks = request.validate()?;

    let id = state.service.create_job(tasks).await?;

    Ok((StatusCode::CREATED, Json(CreateJobResponse { id })))
}

/// `GET /api/jobs/:id`
pub async fn get_job_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ScrapeJob>> {
    let id = parse_job_id(&id)?;

    state
        .service
        .get_job_by_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// `DELETE /api/jobs/:id`
pub async fn delete_job_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_job_id(&id)?;

    if state.service.delete_job_by_id(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_job_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_job_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_job_id("not-a-uuid"), Err(ApiError::NotFound)));
    }
}
