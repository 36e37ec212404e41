use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::MidtransConfig,
    helpers::basic_auth_value,
    MidtransApiError,
    SnapTransaction,
    SnapTransactionRequest,
    TransactionStatus,
};

#[derive(Clone)]
pub struct MidtransApi {
    config: MidtransConfig,
    client: Arc<Client>,
}

impl MidtransApi {
    pub fn new(config: MidtransConfig) -> Result<Self, MidtransApiError> {
        let mut headers = HeaderMap::with_capacity(3);
        let mut auth = HeaderValue::from_str(&basic_auth_value(config.server_key.reveal()))
            .map_err(|e| MidtransApiError::Initialization(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| MidtransApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &MidtransConfig {
        &self.config
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: String,
        timeout: Duration,
        body: Option<B>,
    ) -> Result<T, MidtransApiError> {
        trace!("Sending REST query: {method} {url}");
        let mut req = self.client.request(method, url).timeout(timeout);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(MidtransApiError::from_reqwest)?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| MidtransApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(MidtransApiError::from_reqwest)?;
            Err(MidtransApiError::QueryError { status, message })
        }
    }

    pub fn status_url(&self, order_id: &str) -> String {
        format!("{}/v2/{order_id}/status", self.config.api_base_url())
    }

    pub fn snap_url(&self) -> String {
        format!("{}/snap/v1/transactions", self.config.snap_base_url())
    }

    /// Fetches the current state of the transaction for `order_id`.
    ///
    /// A response without a `transaction_status` (Midtrans reports unknown orders as a 200 with a body-level 404) is
    /// an error, so callers can rely on the field being present.
    pub async fn get_transaction_status(&self, order_id: &str) -> Result<TransactionStatus, MidtransApiError> {
        debug!("Fetching transaction status for order {order_id}");
        let url = self.status_url(order_id);
        let result =
            self.rest_query::<TransactionStatus, ()>(Method::GET, url, self.config.status_timeout, None).await?;
        if result.transaction_status.is_none() {
            let status = result.status_code.as_deref().and_then(|s| s.parse::<u16>().ok()).unwrap_or(404);
            let message = result.status_message.unwrap_or_else(|| "No transaction status in response".to_string());
            return Err(MidtransApiError::QueryError { status, message });
        }
        info!("Fetched transaction status for order {order_id}");
        Ok(result)
    }

    /// Registers a new transaction with Snap and returns the payment token and redirect url for it.
    pub async fn create_snap_transaction(
        &self,
        request: &SnapTransactionRequest,
    ) -> Result<SnapTransaction, MidtransApiError> {
        let order_id = &request.transaction_details.order_id;
        debug!("Creating Snap transaction for order {order_id}");
        let result = self
            .rest_query::<SnapTransaction, &SnapTransactionRequest>(
                Method::POST,
                self.snap_url(),
                self.config.snap_timeout,
                Some(request),
            )
            .await?;
        info!("Created Snap transaction for order {order_id}");
        Ok(result)
    }
}
