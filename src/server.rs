use crate::config::SchedulerConfig;
use crate::data::{SchedulingInput, SchedulingOutput};
use crate::error::{Result, SchedulerError};
use crate::solver;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use std::sync::Arc;

type ApiError = (StatusCode, String);

async fn solve_handler(
    State(config): State<Arc<SchedulerConfig>>,
    Json(input): Json<SchedulingInput>,
) -> std::result::Result<Json<SchedulingOutput>, ApiError> {
    // the solver blocks for the whole solve
    let outcome = tokio::task::spawn_blocking(move || solver::solve(&input, &config))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    match outcome {
        Ok(output) => Ok(Json(output)),
        Err(e) => {
            log::warn!("Solve request failed: {}", e);
            Err((status_for(&e), e.to_string()))
        }
    }
}

fn status_for(err: &SchedulerError) -> StatusCode {
    if err.is_solver_failure() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::BAD_REQUEST
    }
}

pub fn router(config: SchedulerConfig) -> Router {
    Router::new()
        .route("/v1/schedule/solve", post(solve_handler))
        .with_state(Arc::new(config))
}

pub async fn run_server(config: SchedulerConfig) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.server.bind.as_str()).await?;
    log::info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, router(config)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solver_failures_are_unprocessable() {
        assert_eq!(status_for(&SchedulerError::Infeasible), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            status_for(&SchedulerError::Solver("numerical trouble".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        let input_error = SchedulerError::UnknownShift {
            group: "Rotary".into(),
            shift: "Funday".into(),
        };
        assert_eq!(status_for(&input_error), StatusCode::BAD_REQUEST);
    }
}
