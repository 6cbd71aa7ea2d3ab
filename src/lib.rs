//! cn-geocoders: blocking clients for the Baidu, GaoDe (AMap) and Tencent
//! geocoding web services, normalized onto one `Location` type.

pub mod config;
pub mod geocoders;
pub mod logging;

pub use config::{ClientConfig, ProviderId, Scheme, Settings};
pub use geocoders::{
    Baidu, ErrorKind, GaoDe, Geocoder, GeocoderError, Location, Point, Tencent,
};
