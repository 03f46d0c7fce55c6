//! Reddit client audit log handler

use axum::{
  extract::{Extension, State},
  response::Json,
};

use super::{error_response, ErrorResponse};
use crate::server::middleware::RequestContext;
use crate::server::types::{BaseResponse, LogsResponse, PrawLog};
use crate::server::AppState;

/// GET /praw_logs - Every captured Reddit client event, oldest first
pub async fn get_praw_logs(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
) -> Result<Json<BaseResponse<LogsResponse>>, ErrorResponse> {
  match state.audit_log.list_all() {
    Ok(records) => {
      let logs: Vec<PrawLog> = records.into_iter().map(PrawLog::from).collect();
      Ok(Json(BaseResponse::success(LogsResponse { logs }, context.request_id)))
    }
    Err(e) => {
      context.log_error(&format!("Failed to read audit log: {e}"));
      Err(error_response(&e, context.request_id))
    }
  }
}
