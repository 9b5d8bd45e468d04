//! End-to-end behaviour of the widgets through the public API.

use dialgauge::raster::{rasterize, RenderStyle};
use dialgauge::{
    ArcGauge, ArcGaugeConfig, Color, Error, Gauge, GaugeConfig, OutOfRange, Severity, Shape,
    Status, StatusConfig, Widget,
};
use proptest::prelude::*;

fn pixel(frame: &[u8], width: usize, x: usize, y: usize) -> (u8, u8, u8) {
    let idx = (y * width + x) * 4;
    (frame[idx], frame[idx + 1], frame[idx + 2])
}

fn label_text<W: Widget>(widget: &W) -> String {
    match &widget.scene().get(widget.dynamic().label()).unwrap().shape {
        Shape::Text { text, .. } => text.clone(),
        other => panic!("expected text label, got {other:?}"),
    }
}

fn assert_single_dynamic<W: Widget>(widget: &W, static_count: usize) {
    let scene = widget.scene();
    assert_eq!(scene.len(), static_count + 2);
    assert!(scene.contains(widget.dynamic().indicator()));
    assert!(scene.contains(widget.dynamic().label()));
}

#[test]
fn test_gauge_half_scale_points_up() {
    let mut gauge = Gauge::new(GaugeConfig::builder().tick_step(10.0).build()).unwrap();
    assert_eq!(gauge.tick_ids().len(), 11);

    let frames = gauge.set(50.0).unwrap();
    assert_eq!(frames.len(), 1);
    assert!(frames[0].is_final);
    assert_eq!(frames[0].value, 50.0);
    assert!((gauge.pointer_angle() - 90.0).abs() < 1e-9);
    assert_eq!(label_text(&gauge), "50.00");
}

#[test]
fn test_gauge_frame_snapshot_is_independent() {
    let mut gauge = Gauge::new(GaugeConfig::builder().build()).unwrap();
    let first = gauge.set(10.0).unwrap().remove(0);
    let old_pointer = gauge.dynamic().indicator();
    gauge.set(90.0).unwrap();

    assert!(first.scene.contains(old_pointer));
    assert!(!gauge.scene().contains(old_pointer));
    assert!(!first.scene.contains(gauge.dynamic().indicator()));
    assert_eq!(first.value, 10.0);
}

#[test]
fn test_arc_gauge_animates_then_settles() {
    let mut gauge = ArcGauge::new(ArcGaugeConfig::builder().build()).unwrap();
    let frames = gauge.set(60.0).unwrap();

    assert_eq!(frames.len(), 7);
    let values: Vec<f64> = frames.iter().map(|f| f.value).collect();
    assert_eq!(values[0], 0.0);
    assert_eq!(*values.last().unwrap(), 60.0);
    assert!(values.windows(2).all(|w| w[0] < w[1]));
    assert!(frames[..6].iter().all(|f| !f.is_final));
    assert!(frames[6].is_final);

    let sequences: Vec<u64> = frames.iter().map(|f| f.sequence).collect();
    assert_eq!(sequences, (1..=7).collect::<Vec<_>>());
    assert_eq!(label_text(&gauge), "60.00");
}

#[test]
fn test_arc_gauge_clamped_overshoot_stops_at_end() {
    let config = ArcGaugeConfig::builder()
        .out_of_range(OutOfRange::Clamp)
        .build();
    let mut gauge = ArcGauge::new(config).unwrap();
    let frames = gauge.set(250.0).unwrap();
    assert_eq!(frames.last().unwrap().value, 100.0);
    let (start, end) = gauge.arc_span().unwrap();
    assert!((end - start).abs() <= 180.0 + 1e-9);
}

#[test]
fn test_status_thresholds() {
    let mut status = Status::new(StatusConfig::builder().mid(40.0).high(70.0).build()).unwrap();
    for (value, expected) in [
        (39.0, Severity::Normal),
        (40.0, Severity::Warning),
        (70.0, Severity::Critical),
        (71.0, Severity::Critical),
    ] {
        status.set(value).unwrap();
        assert_eq!(status.severity(), expected, "value {value}");
        assert_eq!(status.value(), value);
    }
}

#[test]
fn test_status_rasterizes_red_center() {
    let mut status = Status::new(StatusConfig::builder().mid(50.0).high(80.0).build()).unwrap();
    status.set(95.0).unwrap();

    let frame = rasterize(status.scene(), 120, 80, &RenderStyle::default());
    assert_eq!(frame.len(), 120 * 80 * 4);
    assert_eq!(pixel(&frame, 120, 60, 40), Color::new(255, 0, 0).as_tuple());
    assert_eq!(pixel(&frame, 120, 0, 0), Color::WHITE.as_tuple());
}

#[test]
fn test_gauge_rasterizes_colored_band() {
    let gauge = Gauge::new(GaugeConfig::builder().build()).unwrap();
    let frame = rasterize(gauge.scene(), 160, 120, &RenderStyle::default());
    let painted = frame
        .chunks_exact(4)
        .filter(|p| (p[0], p[1], p[2]) != Color::WHITE.as_tuple())
        .count();
    assert!(painted > 160 * 120 / 10);
}

#[test]
fn test_non_finite_updates_rejected_everywhere() {
    let mut gauge = Gauge::new(GaugeConfig::builder().build()).unwrap();
    let mut arc = ArcGauge::new(ArcGaugeConfig::builder().build()).unwrap();
    let mut status = Status::new(StatusConfig::builder().mid(1.0).high(2.0).build()).unwrap();

    assert!(matches!(gauge.set(f64::NAN), Err(Error::NonFiniteValue(_))));
    assert!(matches!(arc.set(f64::INFINITY), Err(Error::NonFiniteValue(_))));
    assert!(matches!(status.set(f64::NEG_INFINITY), Err(Error::NonFiniteValue(_))));
}

#[test]
fn test_unknown_color_map_rejected() {
    let err = Gauge::new(GaugeConfig::builder().colors("rainbowish").build()).unwrap_err();
    assert!(matches!(err, Error::UnknownColorMap(name) if name == "rainbowish"));
}

proptest! {
    #[test]
    fn prop_dynamic_elements_stay_single(values in prop::collection::vec(-50.0f64..150.0, 1..20)) {
        let mut gauge = Gauge::new(GaugeConfig::builder().tick_step(20.0).build()).unwrap();
        let mut arc = ArcGauge::new(ArcGaugeConfig::builder().animation_steps(3).build()).unwrap();
        let mut status = Status::new(StatusConfig::builder().mid(30.0).high(60.0).build()).unwrap();
        let gauge_static = gauge.scene().len() - 2;
        let arc_static = arc.scene().len() - 2;

        for value in values {
            gauge.set(value).unwrap();
            arc.set(value).unwrap();
            status.set(value).unwrap();

            assert_single_dynamic(&gauge, gauge_static);
            assert_single_dynamic(&arc, arc_static);
            assert_single_dynamic(&status, 0);
            prop_assert_eq!(gauge.value(), value);
            prop_assert_eq!(arc.value(), value);
            prop_assert_eq!(status.value(), value);
        }
    }

    #[test]
    fn prop_extreme_values_keep_scene_bounded(
        values in prop::collection::vec(prop_oneof![-1e20f64..1e20, -1e6f64..1e6, Just(1e20), Just(-1e20)], 1..8)
    ) {
        let mut gauge = Gauge::new(GaugeConfig::builder().build()).unwrap();
        let mut arc = ArcGauge::new(ArcGaugeConfig::builder().animation_steps(2).build()).unwrap();

        for value in values {
            let frames = arc.set(value).unwrap();
            for frame in &frames {
                let bounds = frame.scene.bounds().unwrap();
                prop_assert!(bounds.0.is_finite() && bounds.2.is_finite());
            }
            gauge.set(value).unwrap();

            for (min_x, min_y, max_x, max_y) in [gauge.scene().bounds().unwrap(), arc.scene().bounds().unwrap()] {
                for v in [min_x, min_y, max_x, max_y] {
                    prop_assert!(v.is_finite() && v.abs() < 2.0, "bound {} for value {}", v, value);
                }
            }
        }
        let frame = rasterize(arc.scene(), 32, 24, &RenderStyle::default());
        prop_assert_eq!(frame.len(), 32 * 24 * 4);
    }

    #[test]
    fn prop_pointer_stays_on_dial(value in 0.0f64..=100.0) {
        let mut gauge = Gauge::new(GaugeConfig::builder().build()).unwrap();
        gauge.set(value).unwrap();
        let angle = gauge.pointer_angle();
        prop_assert!((-1e-9..=180.0 + 1e-9).contains(&angle));
    }
}
