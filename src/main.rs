use clap::{Parser, Subcommand};
use cn_geocoders::config::{ProviderId, Scheme, Settings};
use cn_geocoders::geocoders::{
    Baidu, BaiduGeocodeOptions, BaiduReverseOptions, BaiduSearchOptions, GaoDe,
    GaoDeGeocodeOptions, GaoDeSearchOptions, GeocoderError, Location, Point, Tencent,
};
use serde::Serialize;
use std::path::PathBuf;

/// cngeo — geocode addresses with Baidu, GaoDe (AMap) or Tencent Maps.
///
/// API keys come from ~/.cn-geocoders/config.json, from BAIDU_API_KEY /
/// GAODE_API_KEY / TENCENT_API_KEY, or from --key.
///
/// Examples:
///   cngeo geocode "北京市海淀区上地十街10号" --city 北京
///   cngeo --provider gaode geocode "阜通东大街6号" --all
///   cngeo --provider tencent reverse 39.984154 116.30749
///   cngeo search 天安门 --city 北京 --tag 景点 --all
#[derive(Parser)]
#[command(name = "cngeo", version, about, long_about = None)]
struct Cli {
    /// Provider: baidu, gaode (amap) or tencent.
    #[arg(long, short = 'p', default_value = "baidu", value_parser = parse_provider)]
    provider: ProviderId,

    /// API key, overriding config file and environment.
    #[arg(long)]
    key: Option<String>,

    /// URL scheme: http or https.
    #[arg(long, value_parser = parse_scheme)]
    scheme: Option<Scheme>,

    /// Request timeout in seconds.
    #[arg(long)]
    timeout: Option<f64>,

    /// Proxy URL, e.g. http://127.0.0.1:3128.
    #[arg(long)]
    proxy: Option<String>,

    /// User-Agent header override.
    #[arg(long)]
    user_agent: Option<String>,

    /// Config file (defaults to ~/.cn-geocoders/config.json).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log outgoing requests (API key redacted).
    #[arg(long, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Address to coordinates.
    Geocode {
        query: String,

        /// Restrict to a city (Baidu, GaoDe).
        #[arg(long)]
        city: Option<String>,

        /// Return every match instead of the best one.
        #[arg(long)]
        all: bool,
    },

    /// Coordinates to address.
    Reverse {
        #[arg(allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(allow_hyphen_values = true)]
        lng: Option<f64>,

        /// The point as "lat,lng" instead of two numbers.
        #[arg(long, conflicts_with_all = ["lat", "lng"])]
        point: Option<String>,

        /// Coordinate system of the point (Baidu only, e.g. wgs84ll).
        #[arg(long)]
        coordtype: Option<String>,
    },

    /// Keyword place search (Baidu, GaoDe).
    Search {
        query: String,

        #[arg(long)]
        city: Option<String>,

        /// Return every hit instead of the first one.
        #[arg(long)]
        all: bool,

        /// Category filter (Baidu only).
        #[arg(long)]
        tag: Option<String>,

        /// Centre point "lat,lng" for a radius search (Baidu only).
        #[arg(long)]
        location: Option<String>,

        /// Radius in metres around --location (Baidu only).
        #[arg(long)]
        radius: Option<u32>,

        /// Only return hits inside --city (Baidu only).
        #[arg(long)]
        city_limit: bool,
    },
}

fn parse_provider(s: &str) -> Result<ProviderId, String> {
    s.parse()
}

fn parse_scheme(s: &str) -> Result<Scheme, String> {
    s.parse().map_err(|e: GeocoderError| e.to_string())
}

/// Either the best match or every match.
#[derive(Serialize)]
#[serde(untagged)]
enum Output {
    One(Option<Location>),
    Many(Vec<Location>),
}

fn main() {
    let cli = Cli::parse();
    cn_geocoders::logging::init(cli.verbose);

    let output = run(&cli).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    // ── Banner to stderr, JSON to stdout ────────────────────────

    let found = match &output {
        Output::One(loc) => loc.iter().collect::<Vec<_>>(),
        Output::Many(locs) => locs.iter().collect(),
    };
    if found.is_empty() {
        eprintln!("  No match from {}.", cli.provider);
    }
    for loc in found {
        eprintln!("  {}", loc.display_line());
    }

    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: cannot serialize result: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, GeocoderError> {
    let mut settings = match &cli.config {
        Some(path) => {
            let mut settings = Settings::load_from(path)?;
            settings.apply_env(|name| std::env::var(name).ok());
            settings
        }
        None => Settings::load()?,
    };

    if let Some(key) = &cli.key {
        let entry = match cli.provider {
            ProviderId::Baidu => &mut settings.baidu,
            ProviderId::GaoDe => &mut settings.gaode,
            ProviderId::Tencent => &mut settings.tencent,
        };
        entry.api_key = Some(key.clone());
    }
    if let Some(scheme) = cli.scheme {
        settings.scheme = Some(scheme);
    }
    if let Some(timeout) = cli.timeout {
        settings.timeout_secs = Some(timeout);
    }
    if let Some(proxy) = &cli.proxy {
        settings.proxy = Some(proxy.clone());
    }
    if let Some(ua) = &cli.user_agent {
        settings.user_agent = Some(ua.clone());
    }
    Ok(settings)
}

fn run(cli: &Cli) -> Result<Output, GeocoderError> {
    let config = load_settings(cli)?.client_config(cli.provider)?;

    match cli.provider {
        ProviderId::Baidu => run_baidu(&Baidu::new(config)?, &cli.command),
        ProviderId::GaoDe => run_gaode(&GaoDe::new(config)?, &cli.command),
        ProviderId::Tencent => run_tencent(&Tencent::new(config)?, &cli.command),
    }
}

fn reverse_point(
    lat: Option<f64>,
    lng: Option<f64>,
    point: Option<&str>,
) -> Result<Point, GeocoderError> {
    match (point, lat, lng) {
        (Some(text), _, _) => text.parse(),
        (None, Some(lat), Some(lng)) => Point::new(lat, lng),
        _ => Err(GeocoderError::Query(
            "reverse needs <LAT> <LNG> or --point \"lat,lng\"".into(),
        )),
    }
}

/// Fail when a flag the provider cannot honour was given.
fn reject_flag(provider: ProviderId, flag: &str, given: bool) -> Result<(), GeocoderError> {
    if given {
        return Err(GeocoderError::Query(format!(
            "{} is not supported by {}; use --provider baidu",
            flag, provider
        )));
    }
    Ok(())
}

fn run_baidu(geocoder: &Baidu, command: &Command) -> Result<Output, GeocoderError> {
    match command {
        Command::Geocode { query, city, all } => {
            let opts = BaiduGeocodeOptions {
                city: city.clone(),
                ..Default::default()
            };
            if *all {
                Ok(Output::Many(geocoder.geocode_all(query, &opts)?))
            } else {
                Ok(Output::One(geocoder.geocode(query, &opts)?))
            }
        }
        Command::Reverse { lat, lng, point, coordtype } => {
            let point = reverse_point(*lat, *lng, point.as_deref())?;
            let opts = BaiduReverseOptions {
                coordtype: coordtype.clone(),
                ..Default::default()
            };
            Ok(Output::One(geocoder.reverse(point, &opts)?))
        }
        Command::Search { query, city, all, tag, location, radius, city_limit } => {
            let location = location.as_deref().map(str::parse::<Point>).transpose()?;
            let opts = BaiduSearchOptions {
                city: city.clone(),
                location,
                radius: *radius,
                tag: tag.clone(),
                city_limit: *city_limit,
                ..Default::default()
            };
            if *all {
                Ok(Output::Many(geocoder.search_all(query, &opts)?))
            } else {
                Ok(Output::One(geocoder.search(query, &opts)?))
            }
        }
    }
}

fn run_gaode(geocoder: &GaoDe, command: &Command) -> Result<Output, GeocoderError> {
    match command {
        Command::Geocode { query, city, all } => {
            let opts = GaoDeGeocodeOptions {
                city: city.clone(),
                ..Default::default()
            };
            if *all {
                Ok(Output::Many(geocoder.geocode_all(query, &opts)?))
            } else {
                Ok(Output::One(geocoder.geocode(query, &opts)?))
            }
        }
        Command::Reverse { lat, lng, point, coordtype } => {
            reject_flag(ProviderId::GaoDe, "--coordtype", coordtype.is_some())?;
            let point = reverse_point(*lat, *lng, point.as_deref())?;
            Ok(Output::One(geocoder.reverse(point, &Default::default())?))
        }
        Command::Search { query, city, all, tag, location, radius, city_limit } => {
            reject_flag(ProviderId::GaoDe, "--tag", tag.is_some())?;
            reject_flag(ProviderId::GaoDe, "--location", location.is_some())?;
            reject_flag(ProviderId::GaoDe, "--radius", radius.is_some())?;
            reject_flag(ProviderId::GaoDe, "--city-limit", *city_limit)?;
            let opts = GaoDeSearchOptions {
                city: city.clone(),
                ..Default::default()
            };
            if *all {
                Ok(Output::Many(geocoder.search_all(query, &opts)?))
            } else {
                Ok(Output::One(geocoder.search(query, &opts)?))
            }
        }
    }
}

fn run_tencent(geocoder: &Tencent, command: &Command) -> Result<Output, GeocoderError> {
    match command {
        Command::Geocode { query, city, all } => {
            reject_flag(ProviderId::Tencent, "--city", city.is_some())?;
            if *all {
                Ok(Output::Many(geocoder.geocode_all(query, &Default::default())?))
            } else {
                Ok(Output::One(geocoder.geocode(query, &Default::default())?))
            }
        }
        Command::Reverse { lat, lng, point, coordtype } => {
            reject_flag(ProviderId::Tencent, "--coordtype", coordtype.is_some())?;
            let point = reverse_point(*lat, *lng, point.as_deref())?;
            Ok(Output::One(geocoder.reverse(point, &Default::default())?))
        }
        Command::Search { .. } => Err(GeocoderError::Query(
            "Tencent does not offer place search; use --provider baidu or gaode".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_flag() {
        assert!(reject_flag(ProviderId::GaoDe, "--tag", false).is_ok());
        let err = reject_flag(ProviderId::Tencent, "--city", true).unwrap_err();
        assert!(matches!(err, GeocoderError::Query(_)));
        assert!(err.to_string().contains("--city"));
        assert!(err.to_string().contains("Tencent"));
    }

    #[test]
    fn test_reverse_point_forms() {
        let point = reverse_point(None, None, Some("39.98,116.30")).unwrap();
        assert_eq!(point, Point::new(39.98, 116.30).unwrap());
        assert!(reverse_point(Some(39.98), None, None).is_err());
    }
}
