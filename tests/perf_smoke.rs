use candyworld_engine::World;

#[test]
fn perf_smoke_step() {
    let mut world = World::new(0.0, 0.0);
    world.enable_perf_metrics(true);
    // A loose field of obstacles around the spawn.
    for i in 0..500u32 {
        let x = (i % 25) as f32 * 3.0 - 36.0;
        let z = (i / 25) as f32 * 3.0 - 30.0;
        let y = world.ground_height(x, z);
        world.register_object(i, candyworld_engine::domain::objects::KIND_OBSTACLE,
            x, y, z, 1.0, 0.0, 0.0);
    }
    world.set_frame_input(1.0 / 60.0, 0.5, 0.0, 1.0, 0.0, 0.0);
    world.step();
    let stats = world.get_perf_stats();
    assert!(stats.step_ms() >= 0.0);
    assert_eq!(stats.object_count(), 500);
    assert!(stats.broad_candidates() >= stats.culled_candidates());
}
