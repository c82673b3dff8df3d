//! Retrieving license text from a module's repository.
//!
//! - [`strategy`] — ordered file-name/URL guessing against raw-content hosts.
//! - [`github`] — tree/blob API fast path used when GitHub credentials exist.
//!
//! All requests go through a [`Fetcher`], one at a time.

pub mod github;
pub mod strategy;

use anyhow::Result;
use reqwest::{Client, StatusCode};

use crate::config::HttpConfig;
use crate::error::TransportError;
use crate::models::Credentials;

pub use strategy::get_license;

/// GET returning the body of a 200 response; anything else is an error.
pub trait Fetcher {
    async fn get(&self, url: &str, auth: Option<&Credentials>) -> Result<String, TransportError>;
}

/// [`Fetcher`] backed by a shared `reqwest` client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(HttpFetcher { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str, auth: Option<&Credentials>) -> Result<String, TransportError> {
        let mut request = self.client.get(url);
        if let Some(creds) = auth.filter(|c| c.is_set()) {
            request = request.basic_auth(&creds.username, Some(&creds.token));
        }

        let request_error = |source| TransportError::Request {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(request_error)?;
        if response.status() != StatusCode::OK {
            return Err(TransportError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(request_error)
    }
}

#[cfg(test)]
pub mod testing {
    //! In-memory [`Fetcher`] for exercising lookup and fetch logic offline.

    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::Fetcher;
    use crate::error::TransportError;
    use crate::models::Credentials;

    /// Serves canned bodies; every other URL is a 404. Records each request
    /// and whether it carried credentials.
    #[derive(Default)]
    pub struct FakeFetcher {
        pages: HashMap<String, String>,
        pub requests: RefCell<Vec<(String, bool)>>,
    }

    impl FakeFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        pub fn urls(&self) -> Vec<String> {
            self.requests.borrow().iter().map(|(u, _)| u.clone()).collect()
        }
    }

    impl Fetcher for FakeFetcher {
        async fn get(
            &self,
            url: &str,
            auth: Option<&Credentials>,
        ) -> Result<String, TransportError> {
            self.requests
                .borrow_mut()
                .push((url.to_string(), auth.is_some()));
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| TransportError::Status {
                    status: 404,
                    url: url.to_string(),
                })
        }
    }
}
