use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::reports::{SalesReport, SalesReportRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::report_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/sales", post(sales_report))
}

#[utoipa::path(post, path = "/api/reports/sales", request_body = SalesReportRequest, tag = "Reports")]
pub async fn sales_report(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SalesReportRequest>,
) -> AppResult<Json<ApiResponse<SalesReport>>> {
    report_service::sales_report(&state, &user, payload).await.map(Json)
}
