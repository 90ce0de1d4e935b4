use std::future::Future;

use log::debug;
use serde::de::DeserializeOwned;

use super::types::{EventsResponse, GraphData, LiveEvent};
use crate::config::ExplorerConfig;
use crate::error::{ExplorerError, Result};

const GRAPH_PATH: &str = "/graph";
const NEIGHBORS_PATH: &str = "/graph/neighbors";
const EVENTS_PATH: &str = "/events/recent";

/// Read side of the backend graph service.
///
/// Futures are not required to be `Send`: the explorer runs on the
/// browser's single thread.
pub trait GraphSource {
	/// The full snapshot shown on load.
	fn full_graph(&self) -> impl Future<Output = Result<GraphData>>;

	/// Up to `limit` relations around the node called `name`.
	fn neighbors(&self, name: &str, limit: u32) -> impl Future<Output = Result<GraphData>>;

	/// Recent live events, display only.
	fn recent_events(&self) -> impl Future<Output = Result<Vec<LiveEvent>>>;
}

/// `GraphSource` over HTTP. Timeouts are whatever the transport defaults to.
#[derive(Clone, Debug)]
pub struct HttpGraphClient {
	base_url: String,
	http: reqwest::Client,
}

impl HttpGraphClient {
	pub fn new(config: &ExplorerConfig) -> Self {
		Self {
			base_url: config.base_url().to_string(),
			http: reqwest::Client::new(),
		}
	}

	async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
		let url = format!("{}{}", self.base_url, path);
		debug!("GET {url} {query:?}");
		let response = self.http.get(&url).query(query).send().await?;
		let status = response.status();
		if !status.is_success() {
			return Err(ExplorerError::Status {
				status: status.as_u16(),
				endpoint: path.to_string(),
			});
		}
		Ok(response.json::<T>().await?)
	}
}

impl GraphSource for HttpGraphClient {
	async fn full_graph(&self) -> Result<GraphData> {
		let graph: GraphData = self.get_json(GRAPH_PATH, &[]).await?;
		Ok(graph.sanitize())
	}

	async fn neighbors(&self, name: &str, limit: u32) -> Result<GraphData> {
		let query = [("name", name.to_string()), ("limit", limit.to_string())];
		let graph: GraphData = self.get_json(NEIGHBORS_PATH, &query).await?;
		Ok(graph.sanitize())
	}

	async fn recent_events(&self) -> Result<Vec<LiveEvent>> {
		let response: EventsResponse = self.get_json(EVENTS_PATH, &[]).await?;
		Ok(response.events)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn trailing_slash_is_trimmed_from_base_url() {
		let config = ExplorerConfig {
			api_base_url: "http://agri.local:8000/".into(),
			..ExplorerConfig::default()
		};
		assert_eq!(HttpGraphClient::new(&config).base_url, "http://agri.local:8000");
	}

	#[tokio::test]
	async fn malformed_base_url_is_a_request_error() {
		let config = ExplorerConfig {
			api_base_url: "not a url".into(),
			..ExplorerConfig::default()
		};
		let err = HttpGraphClient::new(&config).full_graph().await.unwrap_err();
		assert!(matches!(err, ExplorerError::Request(_)));
	}
}
