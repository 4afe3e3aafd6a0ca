//! Tests in this module connect to the real JPL Horizons system. As such,
//! they require Internet access and might start failing if Horizons' API
//! changes. Run explicitly with `cargo test --test real_horizons -- --ignored`.

use caelundas::body::Body;
use caelundas::ephemeris::EphemerisKind;
use caelundas::location::{Location, TimeRange};
use caelundas::provider::{EphemerisProvider, HorizonsEphemerisProvider};
use chrono::{TimeZone, Utc};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[tokio::test]
#[ignore]
async fn fetches_suns_ecliptic_longitude_for_a_real_day() {
    init();

    let provider = HorizonsEphemerisProvider;
    let location = Location::new(40.7128, -74.0060).unwrap();
    let start = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 3, 20, 0, 10, 0).unwrap();
    let range = TimeRange::new(start, end);

    let bundle = provider
        .fetch(location, range, chrono_tz::America::New_York, &[Body::Sun])
        .await
        .expect("Horizons request should succeed");

    // Around the vernal equinox the Sun's ecliptic longitude sits near 0deg.
    let longitude = bundle
        .get(Body::Sun, start, EphemerisKind::EclipticLongitude)
        .expect("Sun longitude should be present for the requested minute");
    assert!((0.0..10.0).contains(&longitude) || (350.0..360.0).contains(&longitude));
}

#[tokio::test]
#[ignore]
async fn fetches_moon_illumination_for_a_real_day() {
    init();

    let provider = HorizonsEphemerisProvider;
    let location = Location::new(0.0, 0.0).unwrap();
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 1, 1, 0, 5, 0).unwrap();
    let range = TimeRange::new(start, end);

    let bundle = provider
        .fetch(location, range, chrono_tz::UTC, &[Body::Moon])
        .await
        .expect("Horizons request should succeed");

    let illumination = bundle
        .get(Body::Moon, start, EphemerisKind::Illumination)
        .expect("Moon illumination should be present for the requested minute");
    assert!((0.0..=1.0).contains(&illumination));
}
