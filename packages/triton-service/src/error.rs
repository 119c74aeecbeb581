pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{message}")]
	Validation { message: String },
	#[error("{message}")]
	BadRequest { message: String },
	#[error("Internal error: {message}")]
	Internal {
		message: String,
		#[source]
		source: Option<Box<dyn std::error::Error + Send + Sync>>,
	},
}
impl Error {
	/// Whether the caller, not the backend, is at fault. Client errors carry a message that is
	/// safe to show to the caller.
	pub fn is_client_error(&self) -> bool {
		matches!(self, Self::Validation { .. } | Self::BadRequest { .. })
	}

	pub(crate) fn validation(message: impl Into<String>) -> Self {
		Self::Validation { message: message.into() }
	}

	pub(crate) fn internal(
		message: impl Into<String>,
		source: impl std::error::Error + Send + Sync + 'static,
	) -> Self {
		Self::Internal { message: message.into(), source: Some(Box::new(source)) }
	}
}

impl From<triton_solr::Error> for Error {
	fn from(err: triton_solr::Error) -> Self {
		if err.is_client_fault() {
			let message = match err {
				triton_solr::Error::Remote { message, .. } => message,
				other => other.to_string(),
			};
			return Self::BadRequest { message };
		}

		Self::internal("Search engine request failed.", err)
	}
}

#[cfg(test)]
mod tests {
	use std::error::Error as _;

	use super::*;

	#[test]
	fn engine_bad_request_keeps_its_message() {
		let err = Error::from(triton_solr::Error::Remote {
			status: 400,
			message: "undefined field scan.nope".to_string(),
		});

		assert!(err.is_client_error());
		assert_eq!(err.to_string(), "undefined field scan.nope");
	}

	#[test]
	fn unknown_collection_is_a_client_error() {
		let err = Error::from(triton_solr::Error::Remote {
			status: 404,
			message: "Not Found".to_string(),
		});

		assert!(matches!(err, Error::BadRequest { .. }));
	}

	#[test]
	fn other_engine_faults_are_internal_with_cause() {
		let err = Error::from(triton_solr::Error::Remote {
			status: 500,
			message: "Server Error".to_string(),
		});

		assert!(!err.is_client_error());
		assert!(err.source().is_some_and(|source| source.to_string().contains("500")));
	}
}
