//! Error types shared by the graph client and the explorer state.

use thiserror::Error;

/// Everything that can go wrong while talking to the advisory backend.
#[derive(Error, Debug)]
pub enum ExplorerError {
	/// Transport failure, unusable URL, or a response body that did not decode.
	#[error("request failed: {0}")]
	Request(#[from] reqwest::Error),

	/// The backend answered with a non-success status.
	#[error("{endpoint} returned HTTP {status}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Path that was requested.
		endpoint: String,
	},

	/// The body was not the expected JSON shape.
	#[error("malformed response: {0}")]
	Decode(#[from] serde_json::Error),

	/// Rejected configuration value.
	#[error("invalid configuration: {0}")]
	Config(String),
}

/// Result alias for explorer operations.
pub type Result<T> = std::result::Result<T, ExplorerError>;
