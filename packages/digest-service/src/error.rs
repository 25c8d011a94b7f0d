pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Intent extraction failed: {message}")]
	Intent { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Fetch failed: {message}")]
	Fetch { message: String },
	#[error("Reasoning failed: {message}")]
	Reasoning { message: String },
	#[error("Validation failed: {message}")]
	Validation { message: String },
	#[error("Embedding failed: {message}")]
	Embedding { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("{stage} timed out after {timeout_ms} ms.")]
	Timeout { stage: &'static str, timeout_ms: u64 },
}
impl From<digest_storage::Error> for Error {
	fn from(err: digest_storage::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<digest_domain::ValidationError> for Error {
	fn from(err: digest_domain::ValidationError) -> Self {
		Self::Validation { message: err.to_string() }
	}
}
