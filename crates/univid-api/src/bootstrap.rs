// Bootstrap endpoint
//
// Server identity, version, and system settings.

use tracing::debug;

use crate::client::SessionClient;
use crate::error::Error;
use crate::response::ApiResponse;

impl SessionClient {
    /// Fetch the bootstrap document.
    ///
    /// `GET bootstrap`
    ///
    /// Returned loosely typed: the field set varies across NVR releases and
    /// only a handful of fields are read by the domain layer.
    pub async fn bootstrap(&mut self) -> Result<ApiResponse, Error> {
        debug!("fetching bootstrap");
        self.get("bootstrap").await
    }
}
