//! Fetching exchange rates from the remote rate API.
//!
//! The API returns JSON in the following format:
//!
//! ```json
//! {
//!   "result": "success",
//!   "base_code": "USD",
//!   "time_last_update_unix": 1708646401,
//!   "rates": { "USD": 1.0, "EUR": 0.92 }
//! }
//! ```

use std::collections::HashMap;

use reqwest::Client;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{Error, currency::RateTable};

/// The default rate API, rates are relative to USD.
pub const DEFAULT_RATES_URL: &str = "https://open.er-api.com/v6/latest/USD";

#[derive(Debug, Deserialize)]
struct RateResponse {
    result: String,
    base_code: Option<String>,
    rates: Option<HashMap<String, f64>>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

/// Parse the body of a rate API response into a [RateTable] fetched at `now`.
///
/// # Errors
/// Returns [Error::InvalidRateResponse] if the body is not valid JSON, the API
/// reported an error, or the rates are missing or not positive.
pub fn parse_rate_response(body: &str, now: OffsetDateTime) -> Result<RateTable, Error> {
    let response: RateResponse = serde_json::from_str(body)
        .map_err(|error| Error::InvalidRateResponse(error.to_string()))?;

    if response.result != "success" {
        let reason = response.error_type.unwrap_or(response.result);
        return Err(Error::InvalidRateResponse(format!(
            "the rate API returned an error: {reason}"
        )));
    }

    let base = response
        .base_code
        .ok_or_else(|| Error::InvalidRateResponse("missing base_code".to_owned()))?;

    let rates = response
        .rates
        .filter(|rates| !rates.is_empty())
        .ok_or_else(|| Error::InvalidRateResponse("missing rates".to_owned()))?;

    if let Some((code, rate)) = rates
        .iter()
        .find(|(_, rate)| !rate.is_finite() || **rate <= 0.0)
    {
        return Err(Error::InvalidRateResponse(format!(
            "the rate for {code} is {rate}"
        )));
    }

    Ok(RateTable {
        base,
        rates,
        last_updated: Some(now),
    })
}

/// Download the latest rates from `url`.
///
/// # Errors
/// Returns [Error::RateFetch] if the request fails or the server responds with
/// an error status, and [Error::InvalidRateResponse] if the body cannot be
/// parsed.
pub async fn fetch_rates(
    client: &Client,
    url: &str,
    now: OffsetDateTime,
) -> Result<RateTable, Error> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|error| Error::RateFetch(error.to_string()))?;

    if !response.status().is_success() {
        return Err(Error::RateFetch(format!(
            "the rate API responded with HTTP {}",
            response.status()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|error| Error::RateFetch(error.to_string()))?;

    let table = parse_rate_response(&body, now)?;
    tracing::info!("fetched {} exchange rates from {url}", table.rates.len());

    Ok(table)
}
