use std::time::Duration;

use reqwest::Client;

use super::RecordStore;
use super::error::SheetsError;
use super::types::{CellAddress, ValueRange};

/// HTTP client for one spreadsheet of the record store.
#[derive(Clone)]
pub struct SheetsClient {
    token: String,
    spreadsheet_id: String,
    client: Client,
    base_url: String,
}

impl SheetsClient {
    /// The base URL is configurable so tests can point at a local server.
    pub fn new(token: String, spreadsheet_id: String, base_url: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to build HTTP client");
        Self {
            token,
            spreadsheet_id,
            client,
            base_url,
        }
    }

    fn values_url(&self, range: &str) -> String {
        format!("{}/{}/values/{}", self.base_url, self.spreadsheet_id, range)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, SheetsError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

impl RecordStore for SheetsClient {
    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        let response = self
            .client
            .get(self.values_url(range))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = Self::check(response).await?;
        let body = response.json::<ValueRange>().await?;
        Ok(body.values)
    }

    async fn write_cell(&self, address: &CellAddress, value: &str) -> Result<(), SheetsError> {
        let range = address.to_string();
        let body = ValueRange {
            range: Some(range.clone()),
            values: vec![vec![value.to_string()]],
        };
        let response = self
            .client
            .put(self.values_url(&range))
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn append_row(&self, sheet: &str, row: &[String]) -> Result<(), SheetsError> {
        let body = ValueRange {
            range: None,
            values: vec![row.to_vec()],
        };
        let url = format!("{}:append", self.values_url(sheet));
        let response = self
            .client
            .post(url)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
