//! GaoDe (AMap) v3: geocoder and keyword place search.
//!
//! AMap writes every coordinate as `"lng,lat"` text and reports status in
//! `infocode` as a string.

use super::adapter::{
    Coordinates, Endpoint, Geocoder, MissingLocation, Params, PlaceSearch, PointOrder, Profile,
    Provider,
};
use super::status;
use std::time::Duration;

pub type GaoDe = Geocoder<GaoDeApi>;

#[derive(Debug, Clone, Copy)]
pub struct GaoDeApi;

#[derive(Debug, Clone, Default)]
pub struct GaoDeGeocodeOptions {
    /// City name, citycode or adcode.
    pub city: Option<String>,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct GaoDeReverseOptions {
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct GaoDeSearchOptions {
    pub city: Option<String>,
    pub timeout: Option<Duration>,
}

impl Provider for GaoDeApi {
    const PROFILE: Profile = Profile {
        name: "GaoDe",
        host: "restapi.amap.com",
        key_param: "key",
        status_field: "infocode",
        statuses: status::GAODE,
        point_order: PointOrder::LngLat,
        geocode: Endpoint {
            path: "/v3/geocode/geo",
            container: "geocodes",
            address: &[&["formatted_address"]],
            coordinates: Coordinates::LngLatText,
            missing_location: MissingLocation::Reject,
        },
        // regeo answers without coordinates.
        reverse: Endpoint {
            path: "/v3/geocode/regeo",
            container: "regeocode",
            address: &[&["formatted_address"]],
            coordinates: Coordinates::FromQuery,
            missing_location: MissingLocation::Reject,
        },
    };

    type GeocodeOptions = GaoDeGeocodeOptions;
    type ReverseOptions = GaoDeReverseOptions;

    fn geocode_params(options: &GaoDeGeocodeOptions, exactly_one: bool, params: &mut Params) {
        if let Some(city) = &options.city {
            params.push(("city", city.clone()));
        }
        if !exactly_one {
            params.push(("batch", "true".to_string()));
        }
    }

    fn reverse_params(_options: &GaoDeReverseOptions, _params: &mut Params) {}

    fn geocode_timeout(options: &GaoDeGeocodeOptions) -> Option<Duration> {
        options.timeout
    }

    fn reverse_timeout(options: &GaoDeReverseOptions) -> Option<Duration> {
        options.timeout
    }
}

impl PlaceSearch for GaoDeApi {
    const SEARCH: Endpoint = Endpoint {
        path: "/v3/place/text",
        container: "pois",
        address: &[&["address"]],
        coordinates: Coordinates::LngLatText,
        missing_location: MissingLocation::Reject,
    };

    type SearchOptions = GaoDeSearchOptions;

    fn search_params(query: &str, options: &GaoDeSearchOptions, params: &mut Params) {
        params.push(("keywords", query.to_string()));
        if let Some(city) = &options.city {
            params.push(("city", city.clone()));
        }
    }

    fn search_timeout(options: &GaoDeSearchOptions) -> Option<Duration> {
        options.timeout
    }
}
