//! The generic geocoder.
//!
//! Baidu, GaoDe and Tencent differ only in hosts, parameter names, JSON
//! field paths and status tables. A provider describes those in a static
//! `Profile` plus a few parameter hooks; `Geocoder<P>` does the rest.

use super::status::{check_status, StatusTable};
use super::transport::{HttpTransport, Transport};
use super::types::{GeocoderError, Location, Point};
use crate::config::ClientConfig;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Ordered request parameters. Order is kept so logged URLs are stable.
pub type Params = Vec<(&'static str, String)>;

/// Where a parsed place gets its coordinates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coordinates {
    /// `{"location": {"lat": .., "lng": ..}}`, numbers or numeric strings.
    LatLngObject,
    /// `{"location": "lng,lat"}`.
    LngLatText,
    /// The response has none; reuse the point that was queried.
    FromQuery,
}

/// Order of the `location` parameter on reverse requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOrder {
    LatLng,
    LngLat,
}

/// What to do with a list entry whose coordinates are missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingLocation {
    Skip,
    Reject,
}

/// One endpoint and how to read its response.
#[derive(Debug)]
pub struct Endpoint {
    pub path: &'static str,
    /// Top-level key holding the place (object) or places (array).
    pub container: &'static str,
    /// Paths to the display string inside a place; the first one that
    /// resolves to a string wins.
    pub address: &'static [&'static [&'static str]],
    pub coordinates: Coordinates,
    pub missing_location: MissingLocation,
}

/// Static description of a provider.
#[derive(Debug)]
pub struct Profile {
    pub name: &'static str,
    pub host: &'static str,
    /// Name of the API key parameter (`ak` or `key`).
    pub key_param: &'static str,
    /// Top-level key carrying the provider status.
    pub status_field: &'static str,
    pub statuses: &'static StatusTable,
    pub point_order: PointOrder,
    pub geocode: Endpoint,
    pub reverse: Endpoint,
}

/// A geocoding provider: its profile and its request options.
pub trait Provider {
    const PROFILE: Profile;

    type GeocodeOptions: Default;
    type ReverseOptions: Default;

    /// Push provider-specific geocode filters. `exactly_one` is false for
    /// list requests.
    fn geocode_params(options: &Self::GeocodeOptions, exactly_one: bool, params: &mut Params);

    fn reverse_params(options: &Self::ReverseOptions, params: &mut Params);

    fn geocode_timeout(options: &Self::GeocodeOptions) -> Option<Duration>;

    fn reverse_timeout(options: &Self::ReverseOptions) -> Option<Duration>;
}

/// Providers that also offer keyword place search.
pub trait PlaceSearch: Provider {
    const SEARCH: Endpoint;

    type SearchOptions: Default;

    /// Push the query and every filter that is set.
    fn search_params(query: &str, options: &Self::SearchOptions, params: &mut Params);

    fn search_timeout(options: &Self::SearchOptions) -> Option<Duration>;
}

/// A client bound to one provider.
pub struct Geocoder<P: Provider> {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    _provider: PhantomData<fn() -> P>,
}

impl<P: Provider> Geocoder<P> {
    /// Build a client talking HTTP through `ureq`.
    pub fn new(config: ClientConfig) -> Result<Self, GeocoderError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Build a client on top of a custom transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            _provider: PhantomData,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn name(&self) -> &'static str {
        P::PROFILE.name
    }

    /// Geocode an address, returning the best match if any.
    pub fn geocode(
        &self,
        query: &str,
        options: &P::GeocodeOptions,
    ) -> Result<Option<Location>, GeocoderError> {
        Ok(self.geocode_inner(query, options, true)?.into_iter().next())
    }

    /// Geocode an address, returning every match.
    pub fn geocode_all(
        &self,
        query: &str,
        options: &P::GeocodeOptions,
    ) -> Result<Vec<Location>, GeocoderError> {
        self.geocode_inner(query, options, false)
    }

    fn geocode_inner(
        &self,
        query: &str,
        options: &P::GeocodeOptions,
        exactly_one: bool,
    ) -> Result<Vec<Location>, GeocoderError> {
        let profile = &P::PROFILE;
        let mut params = self.base_params();
        params.push(("address", query.to_string()));
        P::geocode_params(options, exactly_one, &mut params);

        let timeout = P::geocode_timeout(options);
        let page = self.call("geocode", profile.geocode.path, &params, timeout)?;
        self.parse_places(&page, &profile.geocode, None, exactly_one)
    }

    /// Find the address at a point. Always at most one place.
    pub fn reverse(
        &self,
        point: impl Into<Point>,
        options: &P::ReverseOptions,
    ) -> Result<Option<Location>, GeocoderError> {
        let point = point.into();
        let point = Point::new(point.latitude, point.longitude)?;
        let profile = &P::PROFILE;

        let mut params = self.base_params();
        let location = match profile.point_order {
            PointOrder::LatLng => point.lat_lng(),
            PointOrder::LngLat => point.lng_lat(),
        };
        params.push(("location", location));
        P::reverse_params(options, &mut params);

        let timeout = P::reverse_timeout(options);
        let page = self.call("reverse", profile.reverse.path, &params, timeout)?;
        let places = self.parse_places(&page, &profile.reverse, Some(point), true)?;
        Ok(places.into_iter().next())
    }

    fn base_params(&self) -> Params {
        vec![
            (P::PROFILE.key_param, self.config.api_key.clone()),
            ("output", "json".to_string()),
        ]
    }

    fn call(
        &self,
        operation: &str,
        path: &str,
        params: &Params,
        timeout: Option<Duration>,
    ) -> Result<Value, GeocoderError> {
        let url = self.build_url(path, params)?;
        tracing::debug!(
            provider = P::PROFILE.name,
            operation,
            url = %redact(&url, P::PROFILE.key_param),
            "geocoder request"
        );

        let timeout = timeout.unwrap_or(self.config.timeout);
        self.transport.get_json(&url, timeout)
    }

    fn build_url(&self, path: &str, params: &Params) -> Result<Url, GeocoderError> {
        let base = format!("{}://{}{}", self.config.scheme, P::PROFILE.host, path);
        Url::parse_with_params(&base, params.iter().map(|(k, v)| (*k, v.as_str())))
            .map_err(|e| GeocoderError::Config(format!("Cannot build URL from '{}': {}", base, e)))
    }

    /// Turn a response page into locations.
    ///
    /// An absent or empty container runs the status check, and a passing
    /// status means "no match". With `exactly_one`, parsing stops at the
    /// first usable place and later entries are never looked at.
    fn parse_places(
        &self,
        page: &Value,
        endpoint: &Endpoint,
        query_point: Option<Point>,
        exactly_one: bool,
    ) -> Result<Vec<Location>, GeocoderError> {
        if !page.is_object() {
            return Err(GeocoderError::InvalidResponse(format!(
                "{} returned a non-object JSON body",
                P::PROFILE.name
            )));
        }

        let places: Vec<&Value> = match page.get(endpoint.container) {
            Some(Value::Array(items)) if !items.is_empty() => items.iter().collect(),
            Some(obj) if obj.as_object().is_some_and(|map| !map.is_empty()) => vec![obj],
            _ => {
                check_status(P::PROFILE.statuses, page.get(P::PROFILE.status_field))?;
                return Ok(Vec::new());
            }
        };

        let mut locations = Vec::with_capacity(places.len());
        for place in places {
            match parse_place(place, endpoint, query_point)? {
                Some(location) if exactly_one => return Ok(vec![location]),
                Some(location) => locations.push(location),
                None => tracing::warn!(
                    provider = P::PROFILE.name,
                    container = endpoint.container,
                    "dropping place without a location"
                ),
            }
        }
        Ok(locations)
    }
}

impl<P: PlaceSearch> Geocoder<P> {
    /// Keyword place search, returning the first hit if any.
    pub fn search(
        &self,
        query: &str,
        options: &P::SearchOptions,
    ) -> Result<Option<Location>, GeocoderError> {
        Ok(self.search_inner(query, options, true)?.into_iter().next())
    }

    /// Keyword place search, returning every hit with a location.
    pub fn search_all(
        &self,
        query: &str,
        options: &P::SearchOptions,
    ) -> Result<Vec<Location>, GeocoderError> {
        self.search_inner(query, options, false)
    }

    fn search_inner(
        &self,
        query: &str,
        options: &P::SearchOptions,
        exactly_one: bool,
    ) -> Result<Vec<Location>, GeocoderError> {
        let mut params = self.base_params();
        P::search_params(query, options, &mut params);

        let page = self.call("search", P::SEARCH.path, &params, P::search_timeout(options))?;
        self.parse_places(&page, &P::SEARCH, None, exactly_one)
    }
}

/// Parse one place. `Ok(None)` means the entry was skipped.
fn parse_place(
    place: &Value,
    endpoint: &Endpoint,
    query_point: Option<Point>,
) -> Result<Option<Location>, GeocoderError> {
    let point = match endpoint.coordinates {
        Coordinates::FromQuery => query_point,
        Coordinates::LatLngObject => match place.get("location") {
            Some(loc) if !loc.is_null() => Some(Point {
                latitude: number_field(loc, "lat")?,
                longitude: number_field(loc, "lng")?,
            }),
            _ => None,
        },
        Coordinates::LngLatText => match place.get("location") {
            Some(Value::String(text)) if !text.is_empty() => Some(parse_lng_lat(text)?),
            _ => None,
        },
    };

    let point = match (point, endpoint.missing_location) {
        (Some(point), _) => point,
        (None, MissingLocation::Skip) => return Ok(None),
        (None, MissingLocation::Reject) => {
            return Err(GeocoderError::InvalidResponse(format!(
                "place without location in '{}'",
                endpoint.container
            )))
        }
    };

    let address = endpoint
        .address
        .iter()
        .find_map(|path| {
            path.iter()
                .try_fold(place, |node, key| node.get(key))
                .and_then(|v| v.as_str())
        })
        .unwrap_or_default()
        .to_string();

    Ok(Some(Location {
        address,
        point,
        raw: place.clone(),
    }))
}

fn number_field(obj: &Value, key: &str) -> Result<f64, GeocoderError> {
    match obj.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| GeocoderError::InvalidResponse(format!("missing or non-numeric '{}'", key)))
}

fn parse_lng_lat(text: &str) -> Result<Point, GeocoderError> {
    let invalid = || GeocoderError::InvalidResponse(format!("bad \"lng,lat\" location '{}'", text));

    let (lng, lat) = text.split_once(',').ok_or_else(invalid)?;
    Ok(Point {
        latitude: lat.trim().parse().map_err(|_| invalid())?,
        longitude: lng.trim().parse().map_err(|_| invalid())?,
    })
}

/// The URL with the API key value masked, for logs.
fn redact(url: &Url, key_param: &str) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == key_param { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory transport for provider tests.

    use super::*;
    use std::sync::Mutex;

    pub struct StubTransport {
        reply: Value,
        pub requests: Mutex<Vec<(Url, Duration)>>,
    }

    impl StubTransport {
        pub fn new(reply: Value) -> Arc<Self> {
            Arc::new(Self {
                reply,
                requests: Mutex::new(Vec::new()),
            })
        }

        pub fn last_url(&self) -> Url {
            self.requests.lock().unwrap().last().unwrap().0.clone()
        }

        pub fn last_timeout(&self) -> Duration {
            self.requests.lock().unwrap().last().unwrap().1
        }

        /// Query parameter lookup on the last request.
        pub fn param(&self, name: &str) -> Option<String> {
            self.last_url()
                .query_pairs()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.into_owned())
        }
    }

    impl Transport for StubTransport {
        fn get_json(&self, url: &Url, timeout: Duration) -> Result<Value, GeocoderError> {
            self.requests.lock().unwrap().push((url.clone(), timeout));
            Ok(self.reply.clone())
        }
    }

    pub fn client<P: Provider>(reply: Value) -> (Geocoder<P>, Arc<StubTransport>) {
        let stub = StubTransport::new(reply);
        let geocoder = Geocoder::with_transport(ClientConfig::new("test-key"), stub.clone());
        (geocoder, stub)
    }
}
