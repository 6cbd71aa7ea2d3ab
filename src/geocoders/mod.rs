//! Geocoding clients for Baidu, GaoDe (AMap) and Tencent Maps.
//!
//! All three are the same generic `Geocoder` driven by a per-provider
//! profile: endpoints, parameter names, JSON field paths and a status table.

pub mod adapter;
pub mod baidu;
pub mod gaode;
pub mod status;
pub mod tencent;
pub mod transport;
pub mod types;

pub use adapter::{Geocoder, PlaceSearch, Provider};
pub use baidu::{Baidu, BaiduApi, BaiduGeocodeOptions, BaiduReverseOptions, BaiduSearchOptions};
pub use gaode::{GaoDe, GaoDeApi, GaoDeGeocodeOptions, GaoDeReverseOptions, GaoDeSearchOptions};
pub use tencent::{Tencent, TencentApi, TencentOptions};
pub use transport::{HttpTransport, Transport};
pub use types::{ErrorKind, GeocoderError, Location, Point};
