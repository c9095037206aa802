//! Per-view fetch state and the cancellable customer-list fetch
//!
//! Fetches are independent requests with loading/error flags and no retries.
//! The customer-list fetch is the one place an in-flight request is
//! cancelled: issuing a new fetch aborts the previous one, and superseded
//! responses are discarded rather than merged.

use crate::api_client::ApiClient;
use pulsedesk_core::{Customer, Error, Result};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// View-state for one asynchronous fetch
#[derive(Debug, Clone, Default)]
pub struct FetchState<T> {
    /// Last successfully fetched payload
    pub data: Option<T>,

    /// Whether a request is in flight
    pub loading: bool,

    /// Message from the last failed request, cleared on the next attempt
    pub error: Option<String>,
}

impl<T> FetchState<T> {
    /// Fresh state with nothing loaded
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }

    /// Mark a request as started
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Store a successful response
    pub fn succeed(&mut self, data: T) {
        self.data = Some(data);
        self.loading = false;
        self.error = None;
    }

    /// Record a failure, keeping any previously loaded data visible
    pub fn fail(&mut self, error: &Error) {
        self.loading = false;
        self.error = Some(error.to_string());
    }
}

/// Last-request-wins fetcher for the customer list
#[derive(Debug)]
pub struct CustomerListFetcher {
    client: ApiClient,
    current: Mutex<Option<CancellationToken>>,
}

impl CustomerListFetcher {
    /// Create a fetcher over the given client
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            current: Mutex::new(None),
        }
    }

    /// Fetch the customer list, aborting any in-flight fetch.
    ///
    /// Returns `Ok(None)` when this request was superseded by a newer one.
    ///
    /// # Errors
    ///
    /// Propagates client errors from the winning request only.
    pub async fn fetch(&self) -> Result<Option<Vec<Customer>>> {
        let token = CancellationToken::new();
        let previous = {
            let mut guard = self
                .current
                .lock()
                .map_err(|_| Error::Other("Customer list fetch lock poisoned".to_string()))?;
            guard.replace(token.clone())
        };
        if let Some(previous) = previous {
            debug!("Aborting superseded customer list fetch");
            previous.cancel();
        }

        tokio::select! {
            () = token.cancelled() => Ok(None),
            result = self.client.list_customers() => {
                if token.is_cancelled() {
                    Ok(None)
                } else {
                    result.map(Some)
                }
            }
        }
    }
}
