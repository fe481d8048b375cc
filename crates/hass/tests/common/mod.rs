//! WireMock-based Home Assistant API mocking.

use hass::{HassClient, HassTools};
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

/// Mock Home Assistant instance plus tools pointed at it.
pub struct MockHass {
    pub server: MockServer,
    pub tools: HassTools,
}

impl MockHass {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let client = HassClient::builder(server.uri(), TOKEN)
            .build()
            .expect("client builds");
        Self {
            server,
            tools: HassTools::new(client),
        }
    }
}
