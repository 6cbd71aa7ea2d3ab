//! Tencent Maps v1 geocoder. Geocode and reverse share one endpoint.

use super::adapter::{
    Coordinates, Endpoint, Geocoder, MissingLocation, Params, PointOrder, Profile, Provider,
};
use super::status;
use std::time::Duration;

pub type Tencent = Geocoder<TencentApi>;

#[derive(Debug, Clone, Copy)]
pub struct TencentApi;

#[derive(Debug, Clone, Default)]
pub struct TencentOptions {
    pub timeout: Option<Duration>,
}

impl Provider for TencentApi {
    const PROFILE: Profile = Profile {
        name: "Tencent",
        host: "apis.map.qq.com",
        key_param: "key",
        status_field: "status",
        statuses: status::TENCENT,
        point_order: PointOrder::LatLng,
        geocode: Endpoint {
            path: "/ws/geocoder/v1/",
            container: "result",
            address: &[&["title"]],
            coordinates: Coordinates::LatLngObject,
            missing_location: MissingLocation::Reject,
        },
        reverse: Endpoint {
            path: "/ws/geocoder/v1/",
            container: "result",
            address: &[
                &["formatted_addresses", "recommend"],
                &["formatted_address", "recommend"],
                &["address"],
            ],
            coordinates: Coordinates::LatLngObject,
            missing_location: MissingLocation::Reject,
        },
    };

    type GeocodeOptions = TencentOptions;
    type ReverseOptions = TencentOptions;

    fn geocode_params(_options: &TencentOptions, _exactly_one: bool, _params: &mut Params) {}

    fn reverse_params(_options: &TencentOptions, _params: &mut Params) {}

    fn geocode_timeout(options: &TencentOptions) -> Option<Duration> {
        options.timeout
    }

    fn reverse_timeout(options: &TencentOptions) -> Option<Duration> {
        options.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, Scheme};
    use crate::geocoders::adapter::testing::{client, StubTransport};
    use crate::geocoders::{ErrorKind, GeocoderError};
    use approx::assert_relative_eq;
    use serde_json::json;

    #[test]
    fn test_geocode() {
        let (geocoder, stub) = client::<TencentApi>(json!({
            "status": 0,
            "message": "query ok",
            "result": {
                "title": "海淀西大街74号",
                "location": {"lng": 116.307015, "lat": 39.982915},
                "similarity": 0.8,
                "deviation": 1000,
                "reliability": 7
            }
        }));

        let loc = geocoder
            .geocode("北京市海淀区彩和坊路海淀西大街74号", &Default::default())
            .unwrap()
            .unwrap();
        assert_eq!(loc.address, "海淀西大街74号");
        assert_relative_eq!(loc.latitude(), 39.982915);
        assert_relative_eq!(loc.longitude(), 116.307015);

        let url = stub.last_url();
        assert_eq!(url.host_str(), Some("apis.map.qq.com"));
        assert_eq!(url.path(), "/ws/geocoder/v1/");
        assert_eq!(stub.param("key").as_deref(), Some("test-key"));
        assert_eq!(stub.param("output").as_deref(), Some("json"));
        assert_eq!(stub.last_timeout(), crate::config::DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_geocode_quota_exceeded() {
        let (geocoder, _) = client::<TencentApi>(json!({"status": 311, "message": "key格式错误"}));
        let err = geocoder.geocode("x", &Default::default()).unwrap_err();
        assert!(matches!(err, GeocoderError::QuotaExceeded(_)));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (110, ErrorKind::Query),
            (306, ErrorKind::Query),
            (310, ErrorKind::AuthenticationFailure),
            (347, ErrorKind::Query),
        ];
        for (code, kind) in cases {
            let (geocoder, _) = client::<TencentApi>(json!({ "status": code }));
            let err = geocoder.geocode_all("x", &Default::default()).unwrap_err();
            assert_eq!(err.kind(), Some(kind), "status {}", code);
        }
    }

    #[test]
    fn test_geocode_empty_success() {
        let (geocoder, _) = client::<TencentApi>(json!({"status": 0, "message": "query ok"}));
        assert!(geocoder.geocode("x", &Default::default()).unwrap().is_none());
        assert!(geocoder.geocode_all("x", &Default::default()).unwrap().is_empty());
    }

    #[test]
    fn test_reverse() {
        let (geocoder, stub) = client::<TencentApi>(json!({
            "status": 0,
            "result": {
                "location": {"lat": 39.984154, "lng": 116.307490},
                "address": "北京市海淀区北四环西路66号",
                "formatted_addresses": {"recommend": "海淀区中关村中国技术交易大厦(彩和坊路)"}
            }
        }));

        let opts = TencentOptions {
            timeout: Some(Duration::from_millis(250)),
        };
        let loc = geocoder.reverse([39.984154, 116.30749], &opts).unwrap().unwrap();
        assert_eq!(loc.address, "海淀区中关村中国技术交易大厦(彩和坊路)");
        assert_relative_eq!(loc.latitude(), 39.984154);
        assert_relative_eq!(loc.longitude(), 116.30749);

        assert_eq!(stub.param("location").as_deref(), Some("39.984154,116.30749"));
        assert_eq!(stub.last_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_reverse_empty_success_is_none() {
        let (geocoder, _) = client::<TencentApi>(json!({"status": 0}));
        assert_eq!(geocoder.reverse((39.98, 116.30), &Default::default()).unwrap(), None);
    }

    #[test]
    fn test_http_scheme() {
        let stub = StubTransport::new(json!({"status": 0}));
        let config = ClientConfig::new("k").with_scheme(Scheme::Http);
        let geocoder = Tencent::with_transport(config, stub.clone());

        geocoder.geocode("x", &Default::default()).unwrap();
        assert_eq!(stub.last_url().scheme(), "http");
        assert_eq!(geocoder.name(), "Tencent");
    }
}
