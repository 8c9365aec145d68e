use approx::assert_abs_diff_eq;
use roverphys_core::VehicleError;
use roverphys_io::*;
use roverphys_vehicles::{Named, VehicleClass, WHEEL_FL};
use serde_json::json;

#[test]
fn minimal_block_uses_class_defaults() {
    let r = Registry::with_builtins();
    let v = load_from_config(&json!({"name": "r1", "class": {"class": "differential"}}), &r).unwrap();
    assert_eq!(v.name(), "r1");
    assert_eq!(v.num_wheels(), 2);
    assert_eq!(v.friction().name(), "coulomb");
    assert_eq!(v.controller().name(), "raw");
    assert_abs_diff_eq!(v.chassis_mass(), 15.0);
}

#[test]
fn full_block_is_honoured() {
    let r = Registry::with_builtins();
    let node = json!({
        "name": "car",
        "class": {"class": "ackermann", "params": {"max_steer": 0.4, "wheelbase": 2.0, "track": 1.2, "radius": 0.35}},
        "chassis": {"polygon": [[-0.5, -0.7], [2.5, -0.7], [2.5, 0.7], [-0.5, 0.7]], "mass": 800.0},
        "friction": {"class": "stribeck", "params": {"tire": "rubber", "ground": "asphalt"}},
        "controller": {"class": "ackermann_pid", "params": {"speed": 2.0, "steer": 0.1}},
        "pose": {"x": 3.0, "y": 4.0, "yaw": 0.5},
        "sensors": [{"class": "pose", "name": "gps", "noise_std": 0.05}, {"class": "encoders", "name": "enc"}]
    });
    let v = load_from_config(&node, &r).unwrap();
    assert_eq!(v.class(), VehicleClass::Ackermann { max_steer: 0.4 });
    assert_abs_diff_eq!(v.wheel(WHEEL_FL).unwrap().x, 2.0);
    assert_abs_diff_eq!(v.wheel(WHEEL_FL).unwrap().radius, 0.35);
    assert_abs_diff_eq!(v.pose().yaw, 0.5);
    assert_eq!(v.sensors().len(), 2);
    assert_eq!(v.controller().steering_angle(), Some(0.1));
}

#[test]
fn explicit_wheels_must_match_the_class() {
    let r = Registry::with_builtins();
    let node = json!({
        "name": "r1",
        "class": {"class": "differential_4_wheels"},
        "wheels": [{"x": 0.0, "y": 0.5, "radius": 0.2}, {"x": 0.0, "y": -0.5, "radius": 0.2}]
    });
    let e = load_from_config(&node, &r).unwrap_err();
    assert!(matches!(e, VehicleError::Configuration(_)), "{e}");
}

#[test]
fn explicit_wheels_get_disc_inertia() {
    let r = Registry::with_builtins();
    let node = json!({
        "name": "r1",
        "class": {"class": "differential"},
        "wheels": [{"x": 0.0, "y": 0.3, "radius": 0.1, "mass": 1.0}, {"x": 0.0, "y": -0.3, "radius": 0.1, "mass": 1.0}]
    });
    let v = load_from_config(&node, &r).unwrap();
    assert_abs_diff_eq!(v.wheels()[0].inertia, 0.005, epsilon = 1e-12);
}

#[test]
fn malformed_documents_are_configuration_errors() {
    let r = Registry::with_builtins();
    for bad in [
        json!({"class": {"class": "differential"}}),
        json!({"name": "x", "class": {"class": "tank"}}),
        json!({"name": "x", "class": {"class": "differential"}, "chassis": {"polygon": [[0.0, 0.0], [1.0, 0.0]], "mass": 1.0}}),
        json!({"name": "x", "class": {"class": "differential"}, "controller": {"class": "ackermann_pid"}}),
    ] {
        assert!(matches!(load_from_config(&bad, &r), Err(VehicleError::Configuration(_))), "{bad}");
    }
}

#[test]
fn scene_builds_a_running_simulation() {
    let r = Registry::with_builtins();
    let scene = r#"{
        "dt": 0.0005,
        "vehicles": [
            {"name": "a", "class": {"class": "differential"}, "controller": {"class": "raw", "params": {"torques": [1.0, 1.0]}}},
            {"name": "b", "class": {"class": "differential_4_wheels"}, "pose": {"x": 5.0, "y": 0.0},
             "controller": {"class": "twist_pid", "params": {"setpoint": {"vx": 0.5, "vy": 0.0, "omega": 0.0}}}}
        ]
    }"#;
    let mut sim = load_scene(scene, &r).unwrap();
    assert_eq!(sim.vehicles().len(), 2);
    assert_eq!(sim.vehicle("b").unwrap().vehicle_index(), 1);
    sim.run(100, 0.0005).unwrap();
    assert!(sim.vehicle("a").unwrap().velocity().vx > 0.0);
}

#[test]
fn descriptor_hash_is_stable_and_sensitive() {
    let a: VehicleDesc = serde_json::from_value(json!({"name": "a", "class": {"class": "differential"}})).unwrap();
    let mut b = a.clone();
    assert_eq!(desc_hash(&a).unwrap(), desc_hash(&b).unwrap());
    b.name = "b".into();
    assert_ne!(desc_hash(&a).unwrap(), desc_hash(&b).unwrap());
}
