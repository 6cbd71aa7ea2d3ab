//! Baidu Maps v2: geocoder and place search.
//!
//! <https://lbsyun.baidu.com/index.php?title=webapi/guide/webservice-geocoding>

use super::adapter::{
    Coordinates, Endpoint, Geocoder, MissingLocation, Params, PlaceSearch, PointOrder, Profile,
    Provider,
};
use super::status;
use super::types::Point;
use std::time::Duration;

/// Baidu client.
pub type Baidu = Geocoder<BaiduApi>;

/// Marker type carrying Baidu's profile.
#[derive(Debug, Clone, Copy)]
pub struct BaiduApi;

#[derive(Debug, Clone, Default)]
pub struct BaiduGeocodeOptions {
    /// Restrict the lookup to a city.
    pub city: Option<String>,
    /// Coordinate system of the returned point (`gcj02ll`, `bd09mc`, ...).
    pub ret_coordtype: Option<String>,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct BaiduReverseOptions {
    /// Coordinate system of the query point (`bd09ll`, `gcj02ll`, `wgs84ll`).
    pub coordtype: Option<String>,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct BaiduSearchOptions {
    /// Sent as `region`.
    pub city: Option<String>,
    /// Corner of a rectangle; only sent together with `location`.
    pub bounds: Option<Point>,
    pub location: Option<Point>,
    /// Metres around `location`; only sent together with it.
    pub radius: Option<u32>,
    /// Category filter, e.g. `美食`.
    pub tag: Option<String>,
    pub ret_coordtype: Option<String>,
    /// Coordinate system of `location`/`bounds`, sent as `coord_type`.
    pub coordtype: Option<String>,
    /// Only return hits inside `city`.
    pub city_limit: bool,
    pub timeout: Option<Duration>,
}

impl Provider for BaiduApi {
    const PROFILE: Profile = Profile {
        name: "Baidu",
        host: "api.map.baidu.com",
        key_param: "ak",
        status_field: "status",
        statuses: status::BAIDU,
        point_order: PointOrder::LatLng,
        geocode: Endpoint {
            path: "/geocoder/v2/",
            container: "result",
            address: &[&["level"]],
            coordinates: Coordinates::LatLngObject,
            missing_location: MissingLocation::Reject,
        },
        reverse: Endpoint {
            path: "/geocoder/v2/",
            container: "result",
            address: &[&["formatted_address"]],
            coordinates: Coordinates::LatLngObject,
            missing_location: MissingLocation::Reject,
        },
    };

    type GeocodeOptions = BaiduGeocodeOptions;
    type ReverseOptions = BaiduReverseOptions;

    fn geocode_params(options: &BaiduGeocodeOptions, _exactly_one: bool, params: &mut Params) {
        if let Some(city) = &options.city {
            params.push(("city", city.clone()));
        }
        if let Some(coordtype) = &options.ret_coordtype {
            params.push(("ret_coordtype", coordtype.clone()));
        }
    }

    fn reverse_params(options: &BaiduReverseOptions, params: &mut Params) {
        if let Some(coordtype) = &options.coordtype {
            params.push(("coordtype", coordtype.clone()));
        }
    }

    fn geocode_timeout(options: &BaiduGeocodeOptions) -> Option<Duration> {
        options.timeout
    }

    fn reverse_timeout(options: &BaiduReverseOptions) -> Option<Duration> {
        options.timeout
    }
}

impl PlaceSearch for BaiduApi {
    const SEARCH: Endpoint = Endpoint {
        path: "/place/v2/search",
        container: "results",
        address: &[&["address"]],
        coordinates: Coordinates::LatLngObject,
        missing_location: MissingLocation::Skip,
    };

    type SearchOptions = BaiduSearchOptions;

    fn search_params(query: &str, options: &BaiduSearchOptions, params: &mut Params) {
        params.push(("query", query.to_string()));
        params.push(("scope", "2".to_string()));

        if let Some(city) = &options.city {
            params.push(("region", city.clone()));
        }
        if let (Some(bounds), Some(location)) = (options.bounds, options.location) {
            params.push(("bounds", format!("{},{}", bounds.lat_lng(), location.lat_lng())));
        }
        if let (Some(location), Some(radius)) = (options.location, options.radius) {
            params.push(("location", location.lat_lng()));
            params.push(("radius", radius.to_string()));
        }
        if let Some(tag) = &options.tag {
            params.push(("tag", tag.clone()));
        }
        if let Some(coordtype) = &options.ret_coordtype {
            params.push(("ret_coordtype", coordtype.clone()));
        }
        if let Some(coordtype) = &options.coordtype {
            params.push(("coord_type", coordtype.clone()));
        }
        if options.city_limit {
            params.push(("city_limit", "true".to_string()));
        }
    }

    fn search_timeout(options: &BaiduSearchOptions) -> Option<Duration> {
        options.timeout
    }
}
