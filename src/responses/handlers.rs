use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    responses::{
        dto::{AgeGroupCount, ExportResponse, LocationCount, StatsResponse},
        repo::{SurveyFields, SurveyResponse},
        service,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/survey-responses",
            get(list_responses).post(create_response),
        )
        .route(
            "/survey-responses/:id",
            put(update_response).delete(delete_response),
        )
        .route("/import-csv", post(import_csv))
        .route("/export-csv", get(export_csv))
        .route("/stats", get(stats))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB uploads
}

#[instrument(skip(state))]
pub async fn list_responses(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<Vec<SurveyResponse>>, ApiError> {
    let responses = SurveyResponse::list_all(&state.db).await?;
    Ok(Json(responses))
}

#[instrument(skip(state, payload))]
pub async fn create_response(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<SurveyFields>,
) -> Result<Json<Value>, ApiError> {
    let id = SurveyResponse::insert(&state.db, &payload, &identity.username, None).await?;
    info!(%id, created_by = %identity.username, "survey response created");
    Ok(Json(json!({
        "id": id,
        "message": "Survey response created successfully"
    })))
}

#[instrument(skip(state, payload))]
pub async fn update_response(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SurveyFields>,
) -> Result<Json<Value>, ApiError> {
    let updated = SurveyResponse::replace(&state.db, id, &payload, &identity.username).await?;
    if updated == 0 {
        return Err(ApiError::NotFound("Survey response"));
    }
    info!(%id, updated_by = %identity.username, "survey response updated");
    Ok(Json(json!({ "message": "Survey response updated successfully" })))
}

#[instrument(skip(state))]
pub async fn delete_response(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let deleted = SurveyResponse::delete(&state.db, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Survey response"));
    }
    info!(%id, deleted_by = %identity.username, "survey response deleted");
    Ok(Json(json!({ "message": "Survey response deleted successfully" })))
}

/// `POST /api/import-csv` (multipart). Rows are inserted one by one; a row
/// that is filtered out does not roll back earlier inserts.
#[instrument(skip(state, multipart))]
pub async fn import_csv(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") || field.file_name().is_some() {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            file = Some((filename, data));
            break;
        }
    }
    let (filename, data) =
        file.ok_or_else(|| ApiError::BadRequest("A file upload is required".into()))?;

    if !filename.ends_with(".csv") {
        warn!(%filename, "rejected non-csv upload");
        return Err(ApiError::InvalidFormat("File must be a CSV".into()));
    }

    let rows = service::parse_import(&data)?;
    let mut imported = 0usize;
    for fields in &rows {
        SurveyResponse::insert(&state.db, fields, &identity.username, Some("csv_upload")).await?;
        imported += 1;
    }

    info!(imported, imported_by = %identity.username, "csv import finished");
    Ok(Json(json!({
        "message": format!("Successfully imported {imported} survey responses")
    })))
}

#[instrument(skip(state))]
pub async fn export_csv(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<(HeaderMap, Json<ExportResponse>), ApiError> {
    let records = SurveyResponse::list_all(&state.db).await?;
    let csv_data = service::export_csv(&records)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=survey_export.csv"),
    );
    Ok((headers, Json(ExportResponse { csv_data })))
}

#[instrument(skip(state))]
pub async fn stats(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<StatsResponse>, ApiError> {
    let records = SurveyResponse::list_all(&state.db).await?;

    let location_distribution =
        service::distribution(records.iter().map(|r| r.fields.location.as_deref()))
            .into_iter()
            .map(|(location, count)| LocationCount { location, count })
            .collect();
    let age_distribution =
        service::distribution(records.iter().map(|r| r.fields.age_group.as_deref()))
            .into_iter()
            .map(|(age_group, count)| AgeGroupCount { age_group, count })
            .collect();

    Ok(Json(StatsResponse {
        total_responses: records.len() as i64,
        location_distribution,
        age_distribution,
    }))
}
