use super::sheet::Workbook;
use crate::error::{PickupError, Result};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

/// Google Sheets v4 REST client exposing a spreadsheet as a [`Workbook`].
/// Tables are worksheet titles.
#[derive(Debug, Clone)]
pub struct SheetsApi {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    token: String,
}

impl SheetsApi {
    pub fn new(
        spreadsheet_id: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            token: token.into(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn spreadsheet_url(&self) -> String {
        format!("{}/spreadsheets/{}", self.base_url, self.spreadsheet_id)
    }

    fn values_url(&self, table: &str) -> String {
        format!(
            "{}/values/{}",
            self.spreadsheet_url(),
            urlencoding::encode(table)
        )
    }

    fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().unwrap_or_default();
        Err(PickupError::BackendUnavailable(format!(
            "sheets api returned {status}: {}",
            body.trim()
        )))
    }

    fn sheet_id(&self, table: &str) -> Result<i64> {
        let url = format!("{}?fields=sheets.properties", self.spreadsheet_url());
        let resp = self.client.get(url).bearer_auth(&self.token).send()?;
        let meta: SpreadsheetMeta = Self::check(resp)?.json()?;
        meta.sheets
            .into_iter()
            .find(|s| s.properties.title == table)
            .map(|s| s.properties.sheet_id)
            .ok_or_else(|| PickupError::BackendUnavailable(format!("no worksheet '{table}'")))
    }
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl Workbook for SheetsApi {
    fn rows(&self, table: &str) -> Result<Vec<Vec<String>>> {
        tracing::debug!(table, "fetching worksheet");
        let resp = self
            .client
            .get(self.values_url(table))
            .bearer_auth(&self.token)
            .send()?;
        let range: ValueRange = Self::check(resp)?.json()?;
        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    fn append_row(&mut self, table: &str, row: Vec<String>) -> Result<()> {
        let url = format!(
            "{}:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
            self.values_url(table)
        );
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&json!({ "values": [row] }))
            .send()?;
        Self::check(resp)?;
        Ok(())
    }

    fn delete_row(&mut self, table: &str, row_number: usize) -> Result<()> {
        if row_number < 2 {
            return Err(PickupError::BackendUnavailable(format!(
                "refusing to delete header row of '{table}'"
            )));
        }
        let sheet_id = self.sheet_id(table)?;
        let body = json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": sheet_id,
                        "dimension": "ROWS",
                        "startIndex": row_number - 1,
                        "endIndex": row_number,
                    }
                }
            }]
        });
        let resp = self
            .client
            .post(format!("{}:batchUpdate", self.spreadsheet_url()))
            .bearer_auth(&self.token)
            .json(&body)
            .send()?;
        Self::check(resp)?;
        Ok(())
    }
}
