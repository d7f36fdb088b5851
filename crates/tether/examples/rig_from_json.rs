//! Rig from JSON — load a rig file and step it.
//!
//! Run with: `RUST_LOG=debug cargo run -p tether --example rig_from_json [path]`

use tether::prelude::*;

fn main() -> tether::Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/assets/hand_rig.json").to_string());
    let mut rig = RigConfig::load(&path)?.build()?;

    let Some(tip) = rig.scene.try_named("right_tip") else {
        return Err(Error::UnknownNode("right_tip".into()));
    };
    for frame in 0..10 {
        let offset = Vec3::new(0.01, 0.02, -0.01) * frame as f32;
        if let Some(position) = rig.scene.world_position(tip) {
            rig.scene.set_world_position(tip, position + offset);
        }
        rig.run_frame();
    }

    for node in rig.scene.nodes() {
        let name = rig.scene.name(node).unwrap_or("<unnamed>");
        log::info!("{name}: {}", rig.scene.world_position(node).unwrap_or_default());
    }
    Ok(())
}
