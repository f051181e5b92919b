//! End-to-end scenarios: coupled functions, probes, injectors, and tracing.

use eddy_core::{RoutineError, RoutineFn, StateNode, TickId, Value};
use eddy_engine::Environment;
use eddy_test_utils::Recorder;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Relativistic toy model: speed compounds by 1% per tick, and time
/// dilation reads the speed through a dependency snapshot.
fn setup_physics(env: &mut Environment) {
    let time = RoutineFn::new("time_dilation", |own: &mut StateNode, deps: &[StateNode]| {
        let speed = deps
            .first()
            .and_then(|s| s.get("lightspeed"))
            .and_then(Value::as_f64)
            .ok_or(RoutineError::MissingKey { key: "lightspeed".into() })?;
        own.set("second_length", 1.0 * (1.0 - speed));
        Ok(())
    });
    let s_time = env.add_function(Box::new(time), "physics.time", &["physics.speed"]);
    s_time.borrow_mut().set("second_length", 1.0);

    let speed = RoutineFn::new("compound_growth", |own: &mut StateNode, _: &[StateNode]| {
        let ls = own
            .get("lightspeed")
            .and_then(Value::as_f64)
            .ok_or(RoutineError::MissingKey { key: "lightspeed".into() })?;
        own.set("lightspeed", ls + ls * 0.01);
        Ok(())
    });
    let s_speed = env.add_function(Box::new(speed), "physics.speed", &[]);
    s_speed.borrow_mut().set("lightspeed", 0.01);
}

#[test]
fn physics_model_runs_a_hundred_ticks() {
    init_logging();
    let mut env = Environment::new();
    setup_physics(&mut env);

    for _ in 0..100 {
        env.tick().unwrap();
    }
    assert_eq!(env.tick_id(), TickId(100));

    // Speed compounds at 1% per tick from 0.01.
    let speed = env.state("physics.speed").unwrap();
    let ls = speed.borrow().get("lightspeed").unwrap().as_f64().unwrap();
    let expected = 0.01 * 1.01f64.powi(100);
    assert!((ls - expected).abs() < 1e-12, "{ls} vs {expected}");

    // Time dilation tracks 1 - lightspeed. physics.time registered first,
    // so it runs before physics.speed and sees the previous tick's value.
    let time = env.state("physics.time").unwrap();
    let second = time.borrow().get("second_length").unwrap().as_f64().unwrap();
    let speed_at_99 = 0.01 * 1.01f64.powi(99);
    assert!((second - (1.0 - speed_at_99)).abs() < 1e-12);
}

#[test]
fn probes_observe_every_tick() {
    init_logging();
    let mut env = Environment::new();
    setup_physics(&mut env);

    let speeds = Recorder::new();
    let seconds = Recorder::new();
    env.add_probe("physics.speed", "lightspeed", speeds.callback())
        .unwrap();
    env.add_probe("physics.time", "second_length", seconds.callback())
        .unwrap();

    for _ in 0..10 {
        env.tick().unwrap();
    }

    assert_eq!(speeds.values().len(), 10);
    assert_eq!(seconds.values().len(), 10);
    // Probes fire after functions, so the first observation is post-update.
    let first = speeds.values()[0].as_f64().unwrap();
    assert!((first - 0.0101).abs() < 1e-12);
}

#[test]
fn injected_value_feeds_the_next_tick() {
    init_logging();
    let mut env = Environment::new();
    setup_physics(&mut env);

    let speeds = Recorder::new();
    env.add_probe("physics.speed", "lightspeed", speeds.callback())
        .unwrap();
    let injector = env.add_injector("physics.speed", "lightspeed").unwrap();

    injector.set(2.0);
    env.tick().unwrap();

    // The probe fired before the injection landed.
    assert!((speeds.last().unwrap().as_f64().unwrap() - 0.0101).abs() < 1e-12);

    // Next tick the function compounds the injected value.
    env.tick().unwrap();
    assert!((speeds.last().unwrap().as_f64().unwrap() - 2.02).abs() < 1e-12);
}

/// The original pizza scenario: glucose decays and spikes on eating; the
/// salience of the smell of pizza scales inversely with glucose.
#[test]
fn hunger_model_with_injected_meal() {
    init_logging();
    let mut env = Environment::new();

    let glucose = RoutineFn::new("blood_sugar", |own: &mut StateNode, _: &[StateNode]| {
        let mut level = own.get("level").and_then(Value::as_f64).unwrap_or(0.0) * 0.95;
        if own.get("just_ate").and_then(Value::as_bool).unwrap_or(false) {
            level += 100.0;
        }
        own.set("level", level);
        own.set("just_ate", false);
        Ok(())
    });
    let s_glucose = env.add_function(Box::new(glucose), "physiology.blood.glucose", &[]);
    s_glucose.borrow_mut().set("level", 1.0);
    s_glucose.borrow_mut().set("just_ate", false);

    let salience = RoutineFn::new("pizza_salience", |own: &mut StateNode, deps: &[StateNode]| {
        let level = deps[0]
            .get("level")
            .and_then(Value::as_f64)
            .ok_or(RoutineError::MissingKey { key: "level".into() })?;
        let need = own.get("need").and_then(Value::as_f64).unwrap_or(0.0);
        own.set("need", need / level);
        Ok(())
    });
    let s_salience = env.add_function(
        Box::new(salience),
        "physiology.brain.salience",
        &["physiology.blood.glucose"],
    );
    s_salience.borrow_mut().set("need", 10.0);

    for _ in 0..10 {
        env.tick().unwrap();
    }
    let hungry_need = s_salience.borrow().get("need").unwrap().as_f64().unwrap();
    assert!(hungry_need > 10.0, "need should grow while glucose decays");

    let eat = env
        .add_injector("physiology.blood.glucose", "just_ate")
        .unwrap();
    eat.set(true);
    env.tick().unwrap();
    env.tick().unwrap();

    let fed_level = s_glucose.borrow().get("level").unwrap().as_f64().unwrap();
    assert!(fed_level > 90.0, "meal should spike glucose, got {fed_level}");
}

#[test]
fn trace_writes_one_parseable_file_per_tick() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let mut env = Environment::new();
    setup_physics(&mut env);

    env.start_trace(dir.path()).unwrap();
    assert!(env.trace_enabled());
    for _ in 0..5 {
        env.tick().unwrap();
    }
    env.stop_trace();
    env.tick().unwrap();

    let mut files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    files.sort();
    assert_eq!(files.len(), 5, "one file per traced tick");

    for file in &files {
        let doc: serde_json::Value =
            serde_json::from_slice(&std::fs::read(file).unwrap()).unwrap();
        assert!(doc["state"]["physics.speed"]["lightspeed"].is_number());
        assert_eq!(doc["functions"]["physics.time"]["dependencies"][0], "physics.speed");
    }

    // The pre-tick snapshot of tick 0 holds the seeded initial state.
    let first: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&files[0]).unwrap()).unwrap();
    assert_eq!(first["tick"], 0);
    assert_eq!(first["state"]["physics.speed"]["lightspeed"], 0.01);
}
