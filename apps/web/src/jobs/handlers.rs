use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::guard::AuthToken;
use crate::dates;
use crate::errors::AppError;
use crate::jobs::commands::{CommandDispatcher, CommandOutcome};
use crate::jobs::store::Snapshot;
use crate::models::job::{JobEdit, JobField, JobFilter, NewJob, Status};
use crate::state::AppState;
use crate::views::layout::{Notice, Page};
use crate::views::pages::{render_job_detail, JobDetailView, JobListView};

/// A page plus the notification raised by the command that produced it.
#[derive(Debug, Serialize)]
pub struct ActionResponse<T> {
    pub notice: Option<Notice>,
    #[serde(flatten)]
    pub page: Page<T>,
}

/// A failed edit whose detail page could not be reloaded either.
#[derive(Debug, Serialize)]
pub struct EditFailure {
    pub notice: Option<Notice>,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

#[derive(Deserialize)]
pub struct StatusChange {
    pub status: Status,
}

#[derive(Deserialize)]
pub struct FieldChange {
    #[serde(default)]
    pub value: String,
}

#[derive(Deserialize)]
pub struct DeleteConfirmation {
    #[serde(default)]
    pub confirm: bool,
}

/// Renders a reload result. A failed reload becomes the single error row,
/// except an auth failure, which is handed to the session guard.
fn list_view(reload: Result<Snapshot, AppError>, filter: JobFilter) -> Result<JobListView, AppError> {
    match reload {
        Ok(snapshot) => Ok(JobListView::render(
            snapshot.filter.clone(),
            &snapshot.jobs,
            dates::today(),
        )),
        Err(AppError::Auth) => Err(AppError::Auth),
        Err(e) => Ok(JobListView::failed(filter, &e.user_message())),
    }
}

async fn command_response<T>(
    state: &AppState,
    outcome: CommandOutcome<T>,
    filter: JobFilter,
    action: &str,
    on_success: (StatusCode, Option<Notice>),
) -> Result<Response, AppError> {
    if matches!(outcome.result, Err(AppError::Auth)) {
        return Err(AppError::Auth);
    }
    let (status, notice) = match &outcome.result {
        Ok(_) => on_success,
        Err(e) => (e.status_code(), outcome.notice(action)),
    };
    let view = list_view(outcome.reload, filter)?;
    let page = state.page(view).await;
    Ok((status, Json(ActionResponse { notice, page })).into_response())
}

/// GET /views/jobs
pub async fn handle_list(
    State(state): State<AppState>,
    Extension(AuthToken(token)): Extension<AuthToken>,
    Query(filter): Query<JobFilter>,
) -> Result<Response, AppError> {
    let reload = state.jobs.load(&token, &filter).await;
    let status = match &reload {
        Ok(_) => StatusCode::OK,
        Err(e) => e.status_code(),
    };
    let view = list_view(reload, filter)?;
    Ok((status, Json(state.page(view).await)).into_response())
}

/// POST /views/jobs
pub async fn handle_create(
    State(state): State<AppState>,
    Extension(AuthToken(token)): Extension<AuthToken>,
    Query(filter): Query<JobFilter>,
    Json(input): Json<NewJob>,
) -> Result<Response, AppError> {
    let dispatcher = CommandDispatcher::new(state.api.as_ref(), &state.jobs, &token, &filter);
    let outcome = dispatcher.create(input).await?;
    command_response(
        &state,
        outcome,
        filter,
        "Error adding job",
        (StatusCode::CREATED, None),
    )
    .await
}

/// PUT /views/jobs/:id/status
pub async fn handle_status(
    State(state): State<AppState>,
    Extension(AuthToken(token)): Extension<AuthToken>,
    Path(id): Path<i64>,
    Query(filter): Query<JobFilter>,
    Json(change): Json<StatusChange>,
) -> Result<Response, AppError> {
    let dispatcher = CommandDispatcher::new(state.api.as_ref(), &state.jobs, &token, &filter);
    let outcome = dispatcher.update_status(id, change.status).await;
    command_response(
        &state,
        outcome,
        filter,
        "Error updating job status",
        (StatusCode::OK, None),
    )
    .await
}

/// PATCH /views/jobs/:id/fields/:field
pub async fn handle_field(
    State(state): State<AppState>,
    Extension(AuthToken(token)): Extension<AuthToken>,
    Path((id, field)): Path<(i64, String)>,
    Query(filter): Query<JobFilter>,
    Json(change): Json<FieldChange>,
) -> Result<Response, AppError> {
    let field: JobField = field.parse().map_err(AppError::Validation)?;
    let dispatcher = CommandDispatcher::new(state.api.as_ref(), &state.jobs, &token, &filter);
    let outcome = dispatcher.update_field(id, field, &change.value).await?;
    command_response(
        &state,
        outcome,
        filter,
        "Error updating job",
        (StatusCode::OK, None),
    )
    .await
}

/// DELETE /views/jobs/:id?confirm=true
pub async fn handle_delete(
    State(state): State<AppState>,
    Extension(AuthToken(token)): Extension<AuthToken>,
    Path(id): Path<i64>,
    Query(filter): Query<JobFilter>,
    Query(confirmation): Query<DeleteConfirmation>,
) -> Result<Response, AppError> {
    let dispatcher = CommandDispatcher::new(state.api.as_ref(), &state.jobs, &token, &filter);
    let outcome = dispatcher.delete(id, confirmation.confirm).await?;
    command_response(
        &state,
        outcome,
        filter,
        "Error deleting job",
        (StatusCode::OK, Some(Notice::info("Job deleted successfully"))),
    )
    .await
}

/// GET /views/jobs/:id
pub async fn handle_detail(
    State(state): State<AppState>,
    Extension(AuthToken(token)): Extension<AuthToken>,
    Path(id): Path<i64>,
) -> Result<Json<Page<JobDetailView>>, AppError> {
    let job = state.api.get_job(&token, id).await?;
    Ok(Json(state.page(render_job_detail(&job)).await))
}

/// PUT /views/jobs/:id
///
/// The detail page reloads its own record after the edit; the list
/// snapshot is refreshed by the dispatcher as for every other command.
pub async fn handle_edit(
    State(state): State<AppState>,
    Extension(AuthToken(token)): Extension<AuthToken>,
    Path(id): Path<i64>,
    Json(edit): Json<JobEdit>,
) -> Result<Response, AppError> {
    let filter = JobFilter::default();
    let dispatcher = CommandDispatcher::new(state.api.as_ref(), &state.jobs, &token, &filter);
    let outcome = dispatcher.update_job(id, edit).await?;

    let (status, notice) = match &outcome.result {
        Err(AppError::Auth) => return Err(AppError::Auth),
        Ok(_) => (StatusCode::OK, Some(Notice::info("Job updated successfully"))),
        Err(e) => (e.status_code(), outcome.notice("Error updating job")),
    };
    let job = match state.api.get_job(&token, id).await.map_err(AppError::from) {
        Ok(job) => job,
        Err(AppError::Auth) => return Err(AppError::Auth),
        // the page cannot be redrawn, but the edit's own failure still reaches the user
        Err(e) if outcome.result.is_err() => {
            warn!(id, error = %e, "job detail reload failed after a failed edit");
            let body = EditFailure {
                notice,
                error: ErrorDetail {
                    code: e.code(),
                    message: e.user_message(),
                },
            };
            return Ok((status, Json(body)).into_response());
        }
        Err(e) => return Err(e),
    };
    let page = state.page(render_job_detail(&job)).await;
    Ok((status, Json(ActionResponse { notice, page })).into_response())
}
