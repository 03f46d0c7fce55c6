//! Keyword resolution and registration handlers

use axum::{
  extract::{Extension, Json, Query, State},
  http::StatusCode,
  response::Json as ResponseJson,
};

use super::{error_response, reject, ErrorResponse};
use crate::error::LookoutError;
use crate::server::middleware::RequestContext;
use crate::server::types::{
  BaseResponse, KeywordData, KeywordDataQuery, KeywordDataResponse, KeywordResponse, RegisterKeywordRequest,
  SubredditPost,
};
use crate::server::AppState;

/// GET /keyword_data - Stored submissions for a keyword, fetched from Reddit on a miss
pub async fn get_keyword_data(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Query(query): Query<KeywordDataQuery>,
) -> Result<ResponseJson<BaseResponse<KeywordDataResponse>>, ErrorResponse> {
  let keyword = match query.keyword.as_deref().filter(|k| !k.trim().is_empty()) {
    Some(keyword) => keyword,
    None => {
      return Err(reject(StatusCode::BAD_REQUEST, "missing_keyword", "Keyword is required", context.request_id));
    }
  };

  match state.service.resolve(keyword, query.account_name.as_deref(), query.industry.as_deref()).await {
    Ok(records) => {
      let results: Vec<SubredditPost> = records.into_iter().map(SubredditPost::from).collect();
      Ok(ResponseJson(BaseResponse::success(KeywordDataResponse { results }, context.request_id)))
    }
    Err(e) => {
      log_failure(&context, &e);
      Err(error_response(&e, context.request_id))
    }
  }
}

/// POST /keyword_data - Register a keyword without fetching
pub async fn register_keyword(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  Json(request): Json<RegisterKeywordRequest>,
) -> Result<(StatusCode, ResponseJson<BaseResponse<KeywordResponse>>), ErrorResponse> {
  match state.service.register_keyword(
    &request.keyword,
    request.account_name.as_deref(),
    request.industry.as_deref(),
  ) {
    Ok(record) => {
      let response = KeywordResponse { keyword: KeywordData::from(record) };
      Ok((StatusCode::CREATED, ResponseJson(BaseResponse::success(response, context.request_id))))
    }
    Err(e) => {
      log_failure(&context, &e);
      Err(error_response(&e, context.request_id))
    }
  }
}

fn log_failure(context: &RequestContext, error: &LookoutError) {
  if error.is_client_error() {
    context.log_warn(&error.to_string());
  } else {
    context.log_error(&error.to_string());
  }
}
