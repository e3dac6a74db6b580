use rocketry_calculator::motors::{MotorError, MotorFilter, ThrustCurveRepository, ValueRange};
use rocketry_calculator::thrust_view;

fn catalog() -> ThrustCurveRepository {
    ThrustCurveRepository::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data/thrustcurve"))
}

#[test]
fn bundled_catalog_loads_sorted_by_file_name() {
    let repo = catalog();
    let ids: Vec<&str> = repo
        .load_all()
        .expect("catalog loads")
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(
        ids,
        [
            "AeroTech_G80T.eng",
            "Estes_1_2A6.eng",
            "Estes_C6.eng",
            "Estes_D12.eng",
            "Quest_MMX.eng",
        ]
    );
}

#[test]
fn repeated_loads_return_the_cached_catalog() {
    let repo = catalog();
    let first = repo.load_all().expect("first load").as_ptr();
    let second = repo.load_all().expect("second load").as_ptr();
    assert_eq!(first, second);
}

#[test]
fn file_names_drive_display_designations() {
    let repo = catalog();
    let half_a = repo.find_by_id("Estes_1_2A6.eng").expect("1/2A6");
    assert_eq!(half_a.designation, "1/2A6");
    assert_eq!(half_a.manufacturer, "Estes Industries");

    let micro = repo.find_by_id("Quest_MMX.eng").expect("MicroMaxx");
    assert_eq!(micro.designation, "MicroMaxx");
    assert_eq!(micro.manufacturer, "Quest Aerospace");

    let g80 = repo.find_by_id("AeroTech_G80T.eng").expect("G80T");
    assert_eq!(g80.display_name(), "AeroTech G80T");
    assert_eq!(g80.title(), "AeroTech G80T");
    assert_eq!(g80.diameter_mm, 29.0);
}

#[test]
fn every_bundled_curve_is_normalised() {
    for curve in catalog().load_all().expect("catalog") {
        let samples = curve.samples();
        assert_eq!(samples[0].time_s, 0.0, "{}", curve.id);
        assert!(samples.windows(2).all(|w| w[0].time_s < w[1].time_s));
        assert!(samples.iter().all(|s| s.thrust_n >= 0.0));
        assert!(curve.impulse_ns() > 0.0);
        assert!(curve.burn_time_s() > 0.0);
        assert!(curve.burn_time_s() <= curve.max_time_s());
        assert!(curve.average_thrust_n() <= curve.peak_thrust_n());
    }
}

#[test]
fn unknown_id_is_not_found() {
    let err = catalog().find_by_id("Estes_Z99.eng").unwrap_err();
    assert!(matches!(err, MotorError::NotFound { ref id } if id == "Estes_Z99.eng"));
}

#[test]
fn filters_combine_manufacturer_and_ranges() {
    let repo = catalog();
    let estes = repo
        .filter(&MotorFilter {
            manufacturer: Some("estes industries".into()),
            ..MotorFilter::default()
        })
        .expect("filter");
    assert_eq!(estes.len(), 3);

    let by_code = repo
        .filter(&MotorFilter {
            manufacturer: Some("E".into()),
            diameter_mm: Some(ValueRange::new(20.0, 30.0)),
            ..MotorFilter::default()
        })
        .expect("filter");
    let ids: Vec<&str> = by_code.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["Estes_D12.eng"]);

    let none = repo
        .filter(&MotorFilter {
            impulse_ns: Some(ValueRange::new(10_000.0, 20_000.0)),
            ..MotorFilter::default()
        })
        .expect("filter");
    assert!(none.is_empty());
}

#[test]
fn catalog_summaries_cover_every_motor() {
    let repo = catalog();
    assert_eq!(
        repo.manufacturers().expect("manufacturers"),
        ["AeroTech", "Estes Industries", "Quest Aerospace"]
    );
    assert_eq!(repo.diameters().expect("diameters"), [6.0, 18.0, 24.0, 29.0]);
    let ranges = repo.ranges().expect("ranges").expect("non-empty catalog");
    assert_eq!(ranges.length_mm, ValueRange::new(40.0, 124.0));
    for curve in repo.load_all().expect("catalog") {
        assert!(ranges.impulse_ns.contains(curve.impulse_ns()));
        assert!(ranges.burn_time_s.contains(curve.burn_time_s()));
    }
}

#[test]
fn thrust_view_resamples_on_request() {
    let repo = catalog();
    let raw = thrust_view(&repo, "Estes_D12.eng", None).expect("raw view");
    assert_eq!(raw.samples.len(), 21);
    assert_eq!(raw.title, "Estes D12");

    let grid = thrust_view(&repo, "Estes_D12.eng", Some(0.1)).expect("resampled");
    // 0.0 ..= 1.6 in 0.1 s steps; the curve ends at 1.65 s.
    assert_eq!(grid.samples.len(), 17);
    for (k, sample) in grid.samples.iter().enumerate() {
        assert!((sample.time_s - k as f64 * 0.1).abs() < 1e-9);
    }
    assert_eq!(grid.impulse_ns, raw.impulse_ns);

    let err = thrust_view(&repo, "Estes_D12.eng", Some(0.0)).unwrap_err();
    assert!(err.to_string().contains("step"));
}
