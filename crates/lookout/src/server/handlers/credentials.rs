//! Reddit credential handler

use axum::{
  extract::{Extension, Json, State},
  response::Json as ResponseJson,
};

use crate::models::CredentialSet;
use crate::server::middleware::RequestContext;
use crate::server::types::{BaseResponse, CredentialsRequest, MessageResponse};
use crate::server::AppState;

/// POST /reddit_credentials - Replace the Reddit credentials used for future fetches
///
/// Nothing is checked here; Reddit rejects bad credentials on the next fetch.
pub async fn update_credentials(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Json(request): Json<CredentialsRequest>,
) -> ResponseJson<BaseResponse<MessageResponse>> {
  let credentials = CredentialSet::new(request.client_id, request.client_secret, request.user_agent);
  state.gateway.update_credentials(credentials).await;
  context.log_info("Reddit credentials updated");

  let response = MessageResponse { message: "Credentials updated successfully".to_string() };
  ResponseJson(BaseResponse::success(response, context.request_id))
}
