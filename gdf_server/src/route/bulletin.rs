use axum::{
    extract::Query,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use gdf_core::{
    boyens,
    churchdesk_client::{ChurchDeskClient, Organization},
    event::ServiceRecord,
    spreadsheet, GdfError,
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct QueryParams {
    year: i32,
    month: u32,
}

/// Handle bulletin requests.
///
/// The `year` and `month` must be given in the query string; every configured
/// organization is queried.
pub async fn fetch_handler(
    Query(query_params): Query<QueryParams>,
) -> Result<Response, (StatusCode, String)> {
    let organizations = Organization::from_env().map_err(internal_error)?;
    let records = ChurchDeskClient::new()
        .get_monthly_records(&organizations, query_params.year, query_params.month)
        .await
        .map_err(internal_error)?;
    Ok(bulletin_response(&records))
}

/// Handle CSV uploads; the request body is the raw CSV export of the
/// schedule table.
pub async fn upload_handler(body: String) -> Result<Response, (StatusCode, String)> {
    let records = spreadsheet::read_records(body.as_bytes())
        .map_err(|error| (StatusCode::BAD_REQUEST, error.to_string()))?;
    Ok(bulletin_response(&records))
}

fn bulletin_response(records: &[ServiceRecord]) -> Response {
    (
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        boyens::format_bulletin(records),
    )
        .into_response()
}

fn internal_error(error: GdfError) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
}
