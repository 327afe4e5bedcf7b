//! The seam between the pipeline and the network.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes probe requests on behalf of the pipeline.
///
/// Implementations must follow redirects and return non-2xx responses as
/// `Ok`. `Err` is reserved for failures where no response arrived at all.
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}
