#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
	/// The host's media matching entry point rejected the query.
	#[error("failed to match media query {query:?}: {reason}")]
	Host { query: String, reason: String },
}

impl Error {
	pub fn host(query: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::Host {
			query: query.into(),
			reason: reason.into(),
		}
	}
}
