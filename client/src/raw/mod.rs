use autoriza_shared::ErrorBody;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::Error;

pub mod auth;
pub mod authorization;
pub mod campus;
pub mod event;
pub mod user;

/// A single backend endpoint.
#[async_trait::async_trait]
pub trait Request {
    type Output;

    const METHOD: reqwest::Method = reqwest::Method::GET;

    /// Path of this endpoint after the url prefix.
    fn url_suffix(&self) -> String;

    fn make_req(&self, req: RequestBuilder) -> Result<RequestBuilder, Error> {
        Ok(req)
    }

    async fn parse_res(&mut self, response: Response) -> Result<Self::Output, Error>;
}

/// Calls a [`Request`] and return its output.
pub async fn call<T>(mut req: T, cx: &crate::Context) -> Result<<T as Request>::Output, Error>
where
    T: Request + Send,
{
    let url = format!("{}{}", cx.url_prefix, req.url_suffix());
    tracing::debug!("{} {}", T::METHOD, url);

    let mut builder = cx.req_client.request(T::METHOD, &url);
    if let Some(token) = cx.token() {
        builder = builder.bearer_auth(token);
    }

    let response = req.make_req(builder)?.send().await.map_err(|err| {
        tracing::warn!("{} {} failed: {err}", T::METHOD, url);
        err
    })?;
    let status = response.status();

    if !status.is_success() {
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail.message().map(str::to_owned));

        tracing::warn!(
            "{} {} returned {status}: {}",
            T::METHOD,
            url,
            detail.as_deref().unwrap_or("no detail")
        );

        return Err(Error::Request { status, detail });
    }

    req.parse_res(response).await
}

/// Deserializes a JSON response body.
pub(crate) async fn json<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    Ok(response.json::<T>().await?)
}
