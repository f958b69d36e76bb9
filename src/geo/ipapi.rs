//! Network geolocation tier backed by ip-api.com.
//!
//! A single bounded GET request; any transport error, non-success status, or
//! out-of-bounds coordinate is treated as tier failure and absorbed into
//! `None` so the resolver can fall through.

use serde::Deserialize;

use super::GeoCoordinate;
use crate::constants::{GEOLOCATION_TIMEOUT, GEOLOCATION_URL};

/// Response body of the geolocation endpoint.
///
/// `status` is "success" on a resolvable address; everything else (including
/// "fail" for reserved ranges) counts as tier failure.
#[derive(Debug, Deserialize)]
pub struct GeoIpResponse {
    pub status: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// A successful lookup: the coordinate plus a printable place name.
#[derive(Debug)]
pub struct IpLookup {
    pub coordinate: GeoCoordinate,
    pub place: String,
}

/// Query the geolocation service for the host's public address.
pub fn detect() -> Option<IpLookup> {
    let agent = ureq::AgentBuilder::new()
        .timeout(GEOLOCATION_TIMEOUT)
        .build();

    let response = agent.get(GEOLOCATION_URL).call().ok()?;
    let body: GeoIpResponse = serde_json::from_reader(response.into_reader()).ok()?;

    lookup_from_response(body)
}

/// Turn a deserialized response into a validated lookup.
pub(super) fn lookup_from_response(body: GeoIpResponse) -> Option<IpLookup> {
    if body.status != "success" {
        return None;
    }

    let coordinate = GeoCoordinate::new(body.lat, body.lon)?;
    let place = format!(
        "{}, {}",
        body.city.as_deref().unwrap_or("Unknown"),
        body.country.as_deref().unwrap_or("Unknown")
    );

    Some(IpLookup { coordinate, place })
}
