//! Reqwest-backed IP geolocation adapter.
//!
//! Resolves the country the current request appears to originate from.
//! Failures here are routine (the lookup service is rate limited and the
//! network may be offline); onboarding treats any error as "use the base
//! currency".

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::domain::ports::{CountryCode, GeolocationError, GeolocationProvider};

/// Geolocation adapter querying one lookup endpoint.
pub struct IpGeolocationProvider {
    client: Client,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponseDto {
    country_code: String,
}

impl IpGeolocationProvider {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl GeolocationProvider for IpGeolocationProvider {
    async fn current_country(&self) -> Result<CountryCode, GeolocationError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|error| GeolocationError::unavailable(error.to_string()))?;
        if !response.status().is_success() {
            return Err(GeolocationError::unavailable(format!(
                "lookup answered {}",
                response.status()
            )));
        }
        let lookup: LookupResponseDto = response
            .json()
            .await
            .map_err(|error| GeolocationError::decode(error.to_string()))?;
        CountryCode::new(lookup.country_code.as_str())
            .map_err(|error| GeolocationError::decode(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for payload decoding.

    use serde_json::json;

    use super::*;

    #[test]
    fn lookup_response_parses_the_country_code() {
        let body = json!({
            "status": "success",
            "country": "United States",
            "countryCode": "US"
        });
        let dto: LookupResponseDto =
            serde_json::from_value(body).expect("tolerates extra fields");
        assert_eq!(dto.country_code, "US");
    }
}
