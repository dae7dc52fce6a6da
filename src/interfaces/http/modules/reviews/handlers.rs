//! Review REST API handlers

use axum::{extract::State, http::StatusCode, Json};

use super::dto::{CreateReviewRequest, ReviewDto};
use crate::interfaces::http::common::{reject, ApiResponse, ValidatedJson};
use crate::interfaces::http::AppState;

type HandlerError = (StatusCode, Json<ApiResponse<()>>);

#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    tag = "Reviews",
    responses(
        (status = 200, description = "All reviews, newest first", body = ApiResponse<Vec<ReviewDto>>)
    )
)]
pub async fn list_reviews(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ReviewDto>>>, HandlerError> {
    let reviews = state.reviews.list().await.map_err(reject)?;
    Ok(Json(ApiResponse::success(
        reviews.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    tag = "Reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review recorded", body = ApiResponse<ReviewDto>),
        (status = 422, description = "Invalid review data")
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewDto>>), HandlerError> {
    let review = state
        .reviews
        .add(&body.name, body.rating, &body.comment)
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(review.into()))))
}
