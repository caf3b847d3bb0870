//! Error type shared by the host, the preset plugin and route pre-handlers

use axum::{
	Json,
	http::StatusCode,
	response::{IntoResponse, Response},
};

pub type PrResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// Invalid plugin or host configuration, detected at registration time
	Config(String),
	/// A route transform failed; aborts registration of that route
	Transform(String),
	/// The same method and url were declared twice
	DuplicateRoute { method: Box<str>, url: Box<str> },
	/// Route url is not mountable (must start with '/')
	InvalidPath(Box<str>),
	/// A pre-handler rejected the request
	Rejected { status: StatusCode, message: String },
	Internal(String),

	// externals
	Io(std::io::Error),
	Json(serde_json::Error),
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			// Configuration messages are part of the public contract, printed as-is
			Error::Config(msg) => write!(f, "{}", msg),
			Error::Transform(msg) => write!(f, "transform error: {}", msg),
			Error::DuplicateRoute { method, url } => {
				write!(f, "route {} {} is already declared", method, url)
			}
			Error::InvalidPath(url) => write!(f, "invalid route path: {:?}", url),
			Error::Rejected { status, message } => write!(f, "rejected ({}): {}", status, message),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
			Error::Json(err) => write!(f, "json error: {}", err),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(err) => Some(err),
			Error::Json(err) => Some(err),
			_ => None,
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::Json(err)
	}
}

impl Error {
	/// Shorthand for a pre-handler rejection
	pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
		Error::Rejected { status, message: message.into() }
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		match self {
			Error::Rejected { status, message } => {
				let body = serde_json::json!({
					"error": {
						"code": "E-REJECTED",
						"message": message,
					}
				});
				(status, Json(body)).into_response()
			}
			_ => {
				let body = serde_json::json!({
					"error": {
						"code": "E-INTERNAL",
						"message": "Internal server error",
					}
				});
				(StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
			}
		}
	}
}

// vim: ts=4
