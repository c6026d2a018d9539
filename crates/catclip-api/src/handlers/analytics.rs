//! Analytics query and ingestion handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use catclip_models::{AnalyticsSummary, EngagementCounts, PerformanceRecord, TimeSlot};

use crate::error::{ApiError, ApiResult};
use crate::metrics::record_submission;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BestQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AverageResponse {
    pub average_engagement_rate: f64,
}

/// A performance observation posted by an external pipeline.
#[derive(Debug, Deserialize)]
pub struct PerformanceSubmission {
    pub post_id: String,
    pub account_id: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub shares: u64,
    #[serde(default)]
    pub views: u64,
    /// Taken as-is when present, otherwise derived from the counts
    pub engagement_rate: Option<f64>,
    /// Defaults to the time of submission
    pub posted_at: Option<DateTime<Utc>>,
}

impl PerformanceSubmission {
    fn into_record(self) -> ApiResult<PerformanceRecord> {
        if self.post_id.trim().is_empty() {
            return Err(ApiError::bad_request("post_id must not be empty"));
        }
        if self.account_id.trim().is_empty() {
            return Err(ApiError::bad_request("account_id must not be empty"));
        }

        let counts = EngagementCounts::new(self.likes, self.comments, self.shares, self.views);
        let posted_at = self.posted_at.unwrap_or_else(Utc::now);

        Ok(match self.engagement_rate {
            Some(rate) => PerformanceRecord::with_rate(self.post_id, self.account_id, counts, rate, posted_at),
            None => PerformanceRecord::new(self.post_id, self.account_id, counts, posted_at),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct PromotionCheckResponse {
    pub should_promote: bool,
    pub threshold: f64,
    pub average_engagement_rate: f64,
}

pub async fn get_summary(State(state): State<AppState>) -> Json<AnalyticsSummary> {
    Json(state.store.summary())
}

/// Top records by engagement rate. A missing, zero or negative limit means 10.
pub async fn get_best_performing(
    State(state): State<AppState>,
    query: Result<Query<BestQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PerformanceRecord>>> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let limit = query
        .limit
        .filter(|l| *l > 0)
        .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
        .unwrap_or(0);

    Ok(Json(state.store.best_performing(limit)))
}

pub async fn get_time_slots(State(state): State<AppState>) -> Json<Vec<TimeSlot>> {
    Json(state.store.optimal_time_slots())
}

pub async fn get_average(State(state): State<AppState>) -> Json<AverageResponse> {
    Json(AverageResponse {
        average_engagement_rate: state.store.average_engagement_rate(),
    })
}

/// Append a record to the history.
pub async fn submit_performance(
    State(state): State<AppState>,
    body: Result<Json<PerformanceSubmission>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PerformanceRecord>)> {
    let Json(submission) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let record = submission.into_record()?;

    info!(
        post_id = %record.post_id,
        account_id = %record.account_id,
        rate = record.engagement_rate,
        "Performance record submitted"
    );

    state.store.append(record.clone());
    record_submission(state.store.len());

    Ok((StatusCode::CREATED, Json(record)))
}

/// Evaluate a record against the current history without storing it.
pub async fn check_promotion(
    State(state): State<AppState>,
    body: Result<Json<PerformanceSubmission>, JsonRejection>,
) -> ApiResult<Json<PromotionCheckResponse>> {
    let Json(submission) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let record = submission.into_record()?;

    // One snapshot so the three figures agree.
    let history = state.store.snapshot();
    let average = catclip_analytics::mean_engagement_rate(&history);
    let policy = state.store.policy();

    Ok(Json(PromotionCheckResponse {
        should_promote: policy.qualifies(&record, average),
        threshold: policy.threshold(average),
        average_engagement_rate: average,
    }))
}
