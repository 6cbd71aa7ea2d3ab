//! Core types shared by every provider client.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A WGS84-style coordinate pair. Providers may interpret it in their own
/// datum (BD-09, GCJ-02); no conversion happens here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    /// Build a point, rejecting coordinates outside the valid ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeocoderError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeocoderError::Query(format!(
                "Latitude {} is out of range (-90..90)",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeocoderError::Query(format!(
                "Longitude {} is out of range (-180..180)",
                longitude
            )));
        }
        Ok(Self { latitude, longitude })
    }

    /// `"lat,lng"` as Baidu and Tencent expect it.
    pub fn lat_lng(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }

    /// `"lng,lat"` as AMap expects it.
    pub fn lng_lat(&self) -> String {
        format!("{},{}", self.longitude, self.latitude)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

impl From<(f64, f64)> for Point {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self { latitude, longitude }
    }
}

impl From<[f64; 2]> for Point {
    fn from([latitude, longitude]: [f64; 2]) -> Self {
        Self { latitude, longitude }
    }
}

impl FromStr for Point {
    type Err = GeocoderError;

    /// Parse `"lat,lng"`, tolerating whitespace around either number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GeocoderError::Query(format!("Cannot parse '{}' as \"lat,lng\"", s));

        let (lat, lng) = s.split_once(',').ok_or_else(invalid)?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;
        Point::new(lat, lng)
    }
}

/// A normalized geocoding hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    /// Display name or address as the provider wrote it. Empty when absent.
    pub address: String,
    pub point: Point,
    /// The provider's JSON object for this place, untouched.
    pub raw: serde_json::Value,
}

impl Location {
    pub fn latitude(&self) -> f64 {
        self.point.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.point.longitude
    }

    pub fn display_line(&self) -> String {
        let name = if self.address.is_empty() { "(unnamed)" } else { &self.address };
        format!("\u{1F4CD} {}\n  \u{1F4D0} {}", name, self.point)
    }
}

/// The three failure classes a provider status code can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Query,
    AuthenticationFailure,
    QuotaExceeded,
}

/// Geocoder errors.
#[derive(Debug)]
pub enum GeocoderError {
    /// Malformed request or an unrecognized provider status.
    Query(String),
    /// The API key or signature was rejected.
    AuthenticationFailure(String),
    /// Rate limits, daily quotas, missing privileges, unavailable service.
    QuotaExceeded(String),
    Timeout(String),
    Network(String),
    InvalidResponse(String),
    Config(String),
}

impl GeocoderError {
    pub fn from_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::Query => Self::Query(message),
            ErrorKind::AuthenticationFailure => Self::AuthenticationFailure(message),
            ErrorKind::QuotaExceeded => Self::QuotaExceeded(message),
        }
    }

    /// The provider-level kind, if this error came from a status check.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Query(_) => Some(ErrorKind::Query),
            Self::AuthenticationFailure(_) => Some(ErrorKind::AuthenticationFailure),
            Self::QuotaExceeded(_) => Some(ErrorKind::QuotaExceeded),
            _ => None,
        }
    }
}

impl fmt::Display for GeocoderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query(msg) => write!(f, "Query error: {}", msg),
            Self::AuthenticationFailure(msg) => write!(f, "Authentication failure: {}", msg),
            Self::QuotaExceeded(msg) => write!(f, "Quota exceeded: {}", msg),
            Self::Timeout(msg) => write!(f, "Request timed out: {}", msg),
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "Invalid API response: {}", msg),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for GeocoderError {}
