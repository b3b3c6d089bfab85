use axum::{
    body::Body,
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, StringRejection},
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde::Serialize;
use serde_json::json;
use std::fmt;
use utoipa::ToSchema;

/// Company fields that carry validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    TotalFunding,
    CurrentRevenue,
    MarketSegment,
    Stage,
    RevenueGrowth,
    Website,
}

impl Field {
    /// Column label as it appears in the CSV header.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Company Name",
            Field::TotalFunding => "Total Funding",
            Field::CurrentRevenue => "Current Revenue",
            Field::MarketSegment => "Market Segment",
            Field::Stage => "Stage",
            Field::RevenueGrowth => "Revenue Growth",
            Field::Website => "Website",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One failed rule on one field.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FieldViolation {
    pub field: Field,
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Structural problems in uploaded CSV text. Rows are 1-based data rows (the header is not counted).
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    MissingHeader,
    DuplicateHeader(String),
    MalformedRow { row: usize, reason: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingHeader => write!(f, "CSV input has no header row"),
            ParseError::DuplicateHeader(label) => write!(f, "Duplicate column in header: {}", label),
            ParseError::MalformedRow { row, reason } => write!(f, "Malformed CSV at row {}: {}", row, reason),
        }
    }
}

impl std::error::Error for ParseError {}

/// First invalid record of a batch. `row` is 1-based in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub row: usize,
    pub field: Field,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid company data at row {} ({}): {}", self.row, self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug)]
pub enum ImportError {
    Parse(ParseError),
    Validation(ValidationError),
    EmptyBatch,
    Store(DbErr),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Parse(err) => write!(f, "{}", err),
            ImportError::Validation(err) => write!(f, "{}", err),
            ImportError::EmptyBatch => write!(f, "No valid companies data provided"),
            ImportError::Store(err) => write!(f, "Failed to import companies: {}", err),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<ParseError> for ImportError {
    fn from(err: ParseError) -> Self {
        ImportError::Parse(err)
    }
}

impl From<ValidationError> for ImportError {
    fn from(err: ValidationError) -> Self {
        ImportError::Validation(err)
    }
}

impl From<DbErr> for ImportError {
    fn from(err: DbErr) -> Self {
        ImportError::Store(err)
    }
}

#[derive(Debug)]
pub enum StoreError {
    NotFound(String),
    Database(DbErr),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(what) => write!(f, "{} not found", what),
            StoreError::Database(err) => write!(f, "Database error: {}", err),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        StoreError::Database(err)
    }
}

#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    NotFound(String),
    Validation(Vec<FieldViolation>),
    UnprocessableEntity(String),
    Store(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::Validation(violations) => {
                let joined: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
                write!(f, "Validation failed: {}", joined.join("; "))
            }
            AppError::UnprocessableEntity(msg) => write!(f, "{}", msg),
            AppError::Store(msg) => write!(f, "{}", msg),
            AppError::InternalError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::NotFound(err.to_string()),
            StoreError::Database(_) => AppError::Store(err.to_string()),
        }
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Parse(_) | ImportError::EmptyBatch => AppError::InvalidRequest(err.to_string()),
            ImportError::Validation(_) => AppError::UnprocessableEntity(err.to_string()),
            ImportError::Store(_) => AppError::Store(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match &rejection {
            JsonRejection::JsonDataError(_) => AppError::UnprocessableEntity(rejection.body_text()),
            _ => AppError::InvalidRequest(rejection.body_text()),
        }
    }
}

impl From<StringRejection> for AppError {
    fn from(rejection: StringRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(%status, "{}", self);
        } else {
            tracing::warn!(%status, "{}", self);
        }

        // Tagged result: callers check `success` rather than the status alone.
        let body = match &self {
            AppError::Validation(violations) => json!({
                "success": false,
                "error": self.to_string(),
                "fieldErrors": violations,
            }),
            _ => json!({
                "success": false,
                "error": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Rewrites error responses produced outside the handlers (rate limiter, unsupported method)
/// into the tagged body. Status and headers such as `retry-after` are kept.
pub async fn tag_plain_errors(response: Response) -> Response {
    let status = response.status();
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json || !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    let message = match status {
        StatusCode::TOO_MANY_REQUESTS => "Too many requests, retry later",
        _ => status.canonical_reason().unwrap_or("Request failed"),
    };
    parts.headers.remove(header::CONTENT_LENGTH);
    parts
        .headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let body = json!({
        "success": false,
        "error": message,
    });
    Response::from_parts(parts, Body::from(body.to_string()))
}
