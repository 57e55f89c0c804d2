use axum::{extract::State, Extension, Json};
use tracing::{debug, warn};

use crate::auth::guard::AuthToken;
use crate::dates;
use crate::errors::AppError;
use crate::jobs::handlers::ActionResponse;
use crate::models::job::JobFilter;
use crate::state::AppState;
use crate::views::layout::Notice;
use crate::views::pages::{render_dashboard, DashboardView};

/// GET /views/dashboard
///
/// Counts and deadlines from the backend summary, timeline and recent jobs
/// from the unfiltered job list. Both requests run concurrently; a failed
/// job list only costs the page its lower half.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Extension(AuthToken(token)): Extension<AuthToken>,
) -> Result<Json<ActionResponse<DashboardView>>, AppError> {
    let filter = JobFilter::default();
    let (summary, jobs) = tokio::join!(
        state.api.dashboard(&token),
        state.api.list_jobs(&token, &filter),
    );
    let summary = summary?;
    let today = dates::today();

    let (view, notice) = match jobs.map_err(AppError::from) {
        Ok(jobs) => {
            debug!(total = summary.total_jobs, listed = jobs.len(), "dashboard loaded");
            (render_dashboard(&summary, Some(jobs.as_slice()), today), None)
        }
        Err(AppError::Auth) => return Err(AppError::Auth),
        Err(e) => {
            warn!(error = %e, "recent jobs unavailable, rendering summary only");
            let notice = Notice::failure("Error loading recent jobs", &e);
            (render_dashboard(&summary, None, today), Some(notice))
        }
    };

    Ok(Json(ActionResponse {
        notice,
        page: state.page(view).await,
    }))
}
