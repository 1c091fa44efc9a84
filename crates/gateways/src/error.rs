/// Errors from the external gateway layer.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream returned a non-2xx status code.
    #[error("Gateway error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The upstream answered 2xx but the body was not the documented
    /// shape (e.g. `success: false`, or GraphQL errors).
    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),
}
