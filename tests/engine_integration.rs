use std::f64::consts::PI;
use std::ops::ControlFlow;
use std::time::Duration;

use ampflow_core::animation::{ManualClock, TickLoop};
use ampflow_core::catalog;
use ampflow_core::geometry::Point;
use ampflow_core::{ComponentId, ComponentKind, EngineConfig, FlowEngine, WireId};
use approx::assert_relative_eq;

const FRAME: Duration = Duration::from_millis(20);

fn prebuilt(id: &str) -> FlowEngine {
    let template = catalog::find_prebuilt(id)
        .unwrap_or_else(|e| panic!("Failed to load {}: {}", id, e));
    FlowEngine::from_template(&template, EngineConfig::default())
        .unwrap_or_else(|e| panic!("Failed to build {}: {}", id, e))
}

#[test]
fn ohms_law_runs_at_constant_speed() {
    let mut engine = prebuilt("ohms-law");
    assert_relative_eq!(engine.current(), 3.0, max_relative = 1e-6);

    let total = engine.animator().path().total_length();
    assert_relative_eq!(total, 695.0, max_relative = 1e-12);
    let speed = engine.animation_speed();

    let clock = ManualClock::new();
    let mut ticks = TickLoop::start(&clock, &mut engine);
    let ran = ticks.run(&mut engine, Duration::ZERO, Some(50), |frame| {
        assert!(frame.flowing);
        assert!(frame.position.is_some());
        clock.advance(FRAME);
        ControlFlow::Continue(())
    });
    assert_eq!(ran, 50);

    // The first frame sees no elapsed time, so 49 frames of movement
    let expected = (speed * 0.98 / total).rem_euclid(1.0);
    assert_relative_eq!(engine.animator().progress(), expected, max_relative = 1e-9);
}

#[test]
fn switch_freezes_and_resumes_the_indicator() {
    let mut engine = prebuilt("dc-circuit");
    let switch = ComponentId::new("dc-switch");
    let clock = ManualClock::new();
    let mut ticks = TickLoop::start(&clock, &mut engine);

    for _ in 0..10 {
        clock.advance(FRAME);
        assert!(ticks.frame(&mut engine).unwrap().flowing);
    }
    assert!(engine.animator().progress() > 0.0);

    engine.toggle_switch(&switch).unwrap();
    clock.advance(FRAME);
    let frozen = ticks.frame(&mut engine).unwrap();
    assert!(!frozen.flowing);
    assert_eq!(frozen.current, 0.0);
    assert_eq!(frozen.position, Some(Point::new(160.0, 215.0)));

    engine.toggle_switch(&switch).unwrap();
    clock.advance(FRAME);
    let resumed = ticks.frame(&mut engine).unwrap();
    assert!(resumed.flowing);
    assert!(resumed.progress > 0.0);
}

#[test]
fn drop_snap_and_delete() {
    let mut engine = prebuilt("dc-circuit");
    assert_relative_eq!(engine.current(), 0.9, max_relative = 1e-6);

    // Near the bottom run of the return wire
    let (id, snap) = engine.drop_component(ComponentKind::Resistor, Point::new(300.0, 308.0));
    let snap = snap.unwrap();
    assert_eq!(snap.wire_id, WireId::new("dc-wire-3"));
    assert_eq!(snap.point(), Point::new(300.0, 300.0));
    assert_relative_eq!(snap.distance, 8.0);

    let placed = engine.circuit().component(&id).unwrap();
    assert_eq!(placed.center(), Point::new(300.0, 300.0));
    assert_eq!(placed.attachment.as_ref().unwrap().wire_id, WireId::new("dc-wire-3"));
    assert_relative_eq!(engine.current(), 0.45, max_relative = 1e-6);

    // Dragged clear of every wire: detached
    let moved = engine.drag_component(&id, Point::new(600.0, 450.0)).unwrap();
    assert!(moved.is_none());
    assert!(engine.circuit().component(&id).unwrap().attachment.is_none());

    engine.toggle_selection(&id).unwrap();
    assert_eq!(engine.delete_selected(), 1);
    assert!(engine.circuit().component(&id).is_none());
    assert_eq!(engine.circuit().components.len(), 3);
    assert_relative_eq!(engine.current(), 0.9, max_relative = 1e-6);
}

#[test]
fn template_switch_changes_source() {
    let mut engine = prebuilt("dc-circuit");
    let ac = catalog::find_prebuilt("ac-circuit").unwrap();
    engine.load_template(&ac).unwrap();

    // 120 V over about 10 Ω; the 1 µF part is below the capacitance floor
    assert_eq!(engine.current(), 10.0);
    assert_eq!(engine.animation_speed(), 600.0);
    assert_eq!(engine.animator().progress(), 0.0);
}

#[test]
fn cancelled_loop_stops_driving_the_engine() {
    let mut engine = prebuilt("ohms-law");
    let clock = ManualClock::new();
    let mut ticks = TickLoop::start(&clock, &mut engine);
    let handle = ticks.cancel_handle();

    clock.advance(FRAME);
    ticks.frame(&mut engine).unwrap();
    let progress = engine.animator().progress();

    handle.cancel();
    clock.advance(FRAME);
    assert!(ticks.frame(&mut engine).is_none());
    assert_eq!(engine.animator().progress(), progress);
}

#[cfg(feature = "cli")]
#[test]
fn series_rlc_file_loads() {
    use std::path::Path;

    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("circuits").join("series-rlc.json");
    let template = catalog::load_file(&path)
        .unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e));
    let mut engine = FlowEngine::from_template(&template, EngineConfig::default()).unwrap();

    let omega = 2.0 * PI * 50.0;
    let xl = omega * 0.1;
    let xc = 1.0 / (omega * 10e-6);
    let expected = 230.0 / ((1000.0f64).powi(2) + (xl - xc).powi(2)).sqrt();
    assert_relative_eq!(engine.current(), expected, max_relative = 1e-6);

    engine.toggle_switch(&ComponentId::new("s1")).unwrap();
    assert_eq!(engine.current(), 0.0);
    assert_eq!(engine.animation_speed(), 0.0);
}

#[cfg(feature = "cli")]
#[test]
fn missing_file_is_reported() {
    let err = catalog::load_file(std::path::Path::new("no/such/circuit.json")).unwrap_err();
    assert!(err.to_string().contains("no/such/circuit.json"));
}
