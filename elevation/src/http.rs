//! Request plumbing shared by all backends.

use log::trace;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use transect::LookupError;

/// Sends `request` and decodes a JSON body of type `T`.
///
/// Non-success statuses are reported as [`LookupError::Status`]
/// without looking at the body.
pub(crate) async fn fetch_json<T>(request: RequestBuilder) -> Result<T, LookupError>
where
    T: DeserializeOwned,
{
    let response = request.send().await.map_err(transport)?;
    let status = response.status();
    trace!("{} {}", status, response.url().path());
    if !status.is_success() {
        return Err(LookupError::Status(status.as_u16()));
    }
    let body = response.bytes().await.map_err(transport)?;
    serde_json::from_slice(&body).map_err(|e| LookupError::Malformed(e.to_string()))
}

fn transport(err: reqwest::Error) -> LookupError {
    LookupError::Transport(Box::new(err))
}
