//! Hand follow — a constrained fingertip drags its hand along.
//!
//! A tracked fingertip wanders around; an axis constraint keeps it level with
//! the hand (no local Y motion, no roll) and a parent follower keeps the hand
//! at its original offset behind the tip.
//!
//! Run with: `RUST_LOG=debug cargo run -p tether --example hand_follow`

use tether::prelude::*;

fn main() {
    env_logger::init();

    let mut scene = Scene::new();
    let hand = scene.spawn_named("hand", Transform::from_xyz(0.0, 1.2, 0.0));
    let tip = scene.spawn_named_child(hand, "tip", Transform::from_xyz(0.0, 0.0, 0.15));

    let mut rig = Rig::new(scene);
    rig.add_parent_follower(tip);
    rig.add_axis_constraint(
        tip,
        AxisFlags {
            position_y: true,
            rotation_z: true,
            ..AxisFlags::NONE
        },
    );

    for frame in 0..120 {
        let t = frame as f32 / 60.0;
        // Tracking input: the tip bobs up and down while it circles.
        rig.scene.set_world_position(
            tip,
            Vec3::new(0.3 * t.cos(), 1.2 + 0.05 * (8.0 * t).sin(), 0.15 + 0.3 * t.sin()),
        );
        rig.scene
            .set_world_rotation(tip, Quat::from_rotation_y(t) * Quat::from_rotation_z(0.4 * t));

        rig.run_frame();

        if frame % 30 == 0 {
            let hand_position = rig.scene.world_position(hand).unwrap_or_default();
            let tip_position = rig.scene.world_position(tip).unwrap_or_default();
            log::info!("frame {frame}: tip {tip_position}, hand {hand_position}");
        }
    }

    #[cfg(feature = "diagnostics")]
    for timing in rig.schedule.timings() {
        log::info!("{}: {:.1}us", timing.name, timing.duration_us);
    }
}
