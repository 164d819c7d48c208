use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use india_climate_core::parse_date;
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Date;
use utoipa::ToSchema;

use crate::db;

pub const MISSING_FIELDS_MESSAGE: &str = "Invalid input. 'city' and 'date' are required.";

/// Body accepted by the predict and historical chart endpoints
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ClimateRequest {
    #[schema(example = "Kochi")]
    pub city: String,
    /// ISO 8601 date; predict uses its month and day, the chart its ISO week
    #[schema(example = "2024-08-05")]
    pub date: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// A validated request
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateQuery {
    pub city: String,
    pub date: Date,
}

impl ClimateQuery {
    /// Accepts any JSON object carrying string `city` and `date` fields.
    pub fn from_payload(payload: Result<Json<Value>, JsonRejection>) -> Result<Self, ApiError> {
        let Json(body) = payload.map_err(|rejection| {
            info!("rejected request body: {}", rejection);
            ApiError::bad_request(MISSING_FIELDS_MESSAGE)
        })?;

        let city = body.get("city").and_then(Value::as_str);
        let date = body.get("date").and_then(Value::as_str);
        let (Some(city), Some(date)) = (city, date) else {
            return Err(ApiError::bad_request(MISSING_FIELDS_MESSAGE));
        };

        let date = parse_date(date).map_err(|_| {
            ApiError::bad_request(format!("Invalid input. '{}' is not an ISO 8601 date.", date))
        })?;

        Ok(Self {
            city: city.to_owned(),
            date,
        })
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<db::Error> for ApiError {
    fn from(err: db::Error) -> Self {
        match err {
            db::Error::CityNotFound(_)
            | db::Error::NoHistoricalDataForDate(_)
            | db::Error::InsufficientHistoricalData => {
                info!("no data for request: {}", err);
                Self {
                    status: StatusCode::NOT_FOUND,
                    message: err.to_string(),
                }
            }
            _ => {
                error!("error answering request: {}", err);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: format!("An unexpected server error occurred: {}", err),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}
