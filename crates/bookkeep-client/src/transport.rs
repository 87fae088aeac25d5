//! The HTTP transport underneath the client.

use std::{future::Future, pin::Pin, time::Duration};

use bytes::Bytes;

use crate::{error, Error};

/// Executes a single buffered HTTP exchange.
///
/// Any response that arrives, whatever its status, is `Ok`; `Err` is reserved
/// for exchanges that did not complete, such as connection failures and timeouts.
pub trait Transport: Send + Sync {
    /// Send the request and collect the whole response.
    fn execute(
        &self,
        request: http::Request<Bytes>,
    ) -> Pin<Box<dyn Future<Output = Result<http::Response<Bytes>, Error>> + Send + '_>>;
}

/// [Transport] backed by [reqwest].
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the given total request timeout.
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()
            .map_err(error::unclassified)?;

        Ok(Self { client })
    }

    /// Use a preconfigured [reqwest::Client].
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn execute(
        &self,
        request: http::Request<Bytes>,
    ) -> Pin<Box<dyn Future<Output = Result<http::Response<Bytes>, Error>> + Send + '_>> {
        Box::pin(async move {
            let request = reqwest::Request::try_from(request).map_err(error::invalid_request)?;
            let response = self.client.execute(request).await.map_err(error::network)?;

            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await.map_err(error::network)?;

            let mut output = http::Response::new(body);
            *output.status_mut() = status;
            *output.headers_mut() = headers;

            Ok(output)
        })
    }
}
