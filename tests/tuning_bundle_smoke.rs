use candyworld_engine::{Tuning, WorldCore};

#[test]
fn tuning_bundle_smoke_loads_and_reshapes_the_world() {
    let mut world = WorldCore::new(0.0, 0.0);
    world.register_object(1, candyworld_engine::domain::objects::KIND_OBSTACLE,
        2.0, 3.0, 0.0, 1.0, 0.0, 0.0);

    // Partial bundle: only the overridden fields change.
    world
        .load_tuning_bundle_json(r#"{"gravity": 25.0, "cell_size": 8.0, "query_reach": 6.0}"#)
        .expect("valid bundle should load");
    assert_eq!(world.tuning().gravity, 25.0);
    assert_eq!(world.tuning().cell_size, 8.0);
    assert_eq!(world.tuning().jump_force, Tuning::default().jump_force);

    // The re-partitioned grid still steps.
    world.set_frame_input(1.0 / 60.0, 0.0, 0.0, 1.0, 0.0, 0.0);
    world.step();
    assert_eq!(world.object_count(), 1);

    // Manifest round-trips through the loader.
    let manifest = world.tuning_manifest_json();
    let back = Tuning::from_bundle_json(&manifest).expect("manifest should parse");
    assert_eq!(back.gravity, 25.0);

    // Broken bundles are rejected and leave tuning untouched.
    assert!(world
        .load_tuning_bundle_json(r#"{"pendulum_damping": 2.0}"#)
        .is_err());
    assert_eq!(world.tuning().gravity, 25.0);
}
