// ── Query transport seam ──
//
// The one capability the coordinator needs from the network: run a
// query document and hand back its `data` object, or fail. Bounding the
// call in time is the implementor's job.

use std::future::Future;

use eetly_api::GraphqlClient;

/// Bounded-duration "fetch(query) -> result-or-error" capability.
pub trait QueryTransport: Send + Sync + 'static {
    fn fetch(
        &self,
        document: &str,
    ) -> impl Future<Output = Result<serde_json::Value, eetly_api::Error>> + Send;
}

impl QueryTransport for GraphqlClient {
    fn fetch(
        &self,
        document: &str,
    ) -> impl Future<Output = Result<serde_json::Value, eetly_api::Error>> + Send {
        self.query(document)
    }
}
