pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error("Solr responded with HTTP {status}: {message}")]
	Remote { status: u16, message: String },
	#[error("{message}")]
	InvalidResponse { message: String },
	#[error("Solr connection pool is closed.")]
	PoolClosed,
}
impl Error {
	/// Faults Solr attributes to the request itself: bad syntax, unknown field, unknown
	/// collection.
	pub fn is_client_fault(&self) -> bool {
		matches!(self, Self::Remote { status: 400 | 404, .. })
	}

	pub(crate) fn invalid_response(message: impl Into<String>) -> Self {
		Self::InvalidResponse { message: message.into() }
	}
}
