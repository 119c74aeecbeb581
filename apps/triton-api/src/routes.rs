use std::time::Instant;

use axum::{
	Json, Router,
	body::Body,
	extract::{Query, State},
	http::{HeaderMap, HeaderValue, Request, StatusCode, header},
	middleware::{self, Next},
	response::{IntoResponse, Response},
	routing::get,
};
use serde::{Deserialize, Serialize};

use triton_domain::ScanPos;
use triton_service::{Error as ServiceError, ScanRequest, ScanResult};

use crate::{state::AppState, xml};

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// Raw `/scan` query parameters. Typed values are parsed by hand so that malformed input gets the
/// same error body as every other client error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanParams {
	pub term: Option<String>,
	pub index: Option<String>,
	pub collection: Option<String>,
	pub pos: Option<String>,
	pub size: Option<String>,
	pub include: Option<String>,
	pub with_exact_frequency: Option<String>,
	pub field_type: Option<String>,
}
impl ScanParams {
	pub fn into_request(self) -> Result<ScanRequest, ApiError> {
		let pos = match self.pos.as_deref().map(str::trim).filter(|pos| !pos.is_empty()) {
			Some(pos) => pos.parse::<ScanPos>().map_err(|err| bad_request(err.to_string()))?,
			None => ScanPos::First,
		};
		let size = match self.size.as_deref().map(str::trim).filter(|size| !size.is_empty()) {
			Some(size) => Some(size.parse::<u32>().map_err(|_| {
				bad_request(format!("size must be a non-negative integer, got {size:?}."))
			})?),
			None => None,
		};
		let with_exact_frequency = self
			.with_exact_frequency
			.as_deref()
			.map(str::trim)
			.filter(|flag| !flag.is_empty())
			.is_none_or(|flag| flag.eq_ignore_ascii_case("true"));
		Ok(ScanRequest {
			term: self.term,
			index: self.index,
			collection: self.collection,
			pos,
			size,
			include: self.include,
			with_exact_frequency,
			field_type: self.field_type,
		})
	}
}

#[derive(Debug, Serialize)]
struct HealthBody {
	status: String,
	qtime_ms: u64,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		if err.is_client_error() {
			return bad_request(err.to_string());
		}

		tracing::error!(error = ?err, "Scan failed.");

		ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Internal error.")
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };
		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/scan", get(scan))
		.route("/health/live", get(health))
		.route("/health/ready", get(health))
		.layer(middleware::from_fn(access_log))
		.with_state(state)
}

async fn scan(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(params): Query<ScanParams>,
) -> Result<Response, ApiError> {
	let req = params.into_request()?;
	let result = state.service.scan(req).await?;
	Ok(render(&headers, &result))
}

async fn health(State(state): State<AppState>) -> Response {
	match state.service.ping().await {
		Ok(ping) if ping.is_ok() => {
			(StatusCode::OK, Json(HealthBody { status: ping.status, qtime_ms: ping.qtime_ms }))
				.into_response()
		},
		Ok(ping) => {
			tracing::warn!(status = ping.status.as_str(), "Default collection is not healthy.");

			(
				StatusCode::SERVICE_UNAVAILABLE,
				Json(HealthBody { status: ping.status, qtime_ms: ping.qtime_ms }),
			)
				.into_response()
		},
		Err(err) => {
			tracing::warn!(error = %err, "Default collection ping failed.");

			let message = "Search engine is unreachable.";
			ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "unavailable", message).into_response()
		},
	}
}

async fn access_log(req: Request<Body>, next: Next) -> Response {
	let method = req.method().clone();
	let uri = req.uri().clone();
	let started = Instant::now();
	let response = next.run(req).await;
	tracing::info!(
		%method,
		%uri,
		status = response.status().as_u16(),
		elapsed_ms = started.elapsed().as_millis() as u64,
		"Handled request."
	);

	response
}

fn render(headers: &HeaderMap, result: &ScanResult) -> Response {
	if wants_xml(headers) {
		return (
			[(header::CONTENT_TYPE, HeaderValue::from_static(XML_CONTENT_TYPE))],
			xml::scan_result(result),
		)
			.into_response();
	}

	Json(result).into_response()
}

/// XML only when it is the first of JSON or XML the client lists.
fn wants_xml(headers: &HeaderMap) -> bool {
	let Some(accept) = headers.get(header::ACCEPT).and_then(|value| value.to_str().ok()) else {
		return false;
	};

	for range in accept.split(',') {
		let media = range.split(';').next().unwrap_or_default().trim();
		if media.eq_ignore_ascii_case("application/json") {
			return false;
		}
		if media.eq_ignore_ascii_case("application/xml") || media.eq_ignore_ascii_case("text/xml") {
			return true;
		}
	}

	false
}

fn bad_request(message: impl Into<String>) -> ApiError {
	ApiError::new(StatusCode::BAD_REQUEST, "bad_request", message)
}
