//! HTTP clients for the three external collaborators: the time-slot
//! registry, the product catalog, and the affiliate link converter.
//!
//! All three are thin [`reqwest`] wrappers; they return typed DTOs and
//! a shared [`GatewayError`]. Retry, caching, and batching policy live
//! in the `pipeline` crate.

mod error;

pub mod affiliate;
pub mod catalog;
pub mod registry;

pub use error::GatewayError;

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or a [`GatewayError::Api`] with the status and
/// body text on failure.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(GatewayError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body into the expected type.
async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, GatewayError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}
