//! Credential header injection.

use reqwest::RequestBuilder;

pub const APP_TOKEN_HEADER: &str = "X-Claimb-App-Token";
pub const DEVICE_HEADER: &str = "X-Claimb-Device";

/// Adds credentials (or anything else) to every outbound request.
pub trait RequestDecorator: Send + Sync {
    fn decorate(&self, builder: RequestBuilder) -> RequestBuilder;
}

/// Leaves requests untouched. Used for public endpoints such as Data Dragon.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAuth;

impl RequestDecorator for NoAuth {
    fn decorate(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
    }
}

/// Headers expected by the Claimb edge function.
#[derive(Clone)]
pub struct ClaimbAuth {
    anon_key: String,
    app_token: String,
    device_id: String,
}

impl ClaimbAuth {
    pub fn new(
        anon_key: impl Into<String>,
        app_token: impl Into<String>,
        device_id: impl Into<String>,
    ) -> Self {
        Self { anon_key: anon_key.into(), app_token: app_token.into(), device_id: device_id.into() }
    }
}

impl std::fmt::Debug for ClaimbAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimbAuth")
            .field("anon_key", &"***")
            .field("app_token", &"***")
            .field("device_id", &self.device_id)
            .finish()
    }
}

impl RequestDecorator for ClaimbAuth {
    fn decorate(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.anon_key)
            .header(APP_TOKEN_HEADER, &self.app_token)
            .header(DEVICE_HEADER, &self.device_id)
    }
}
