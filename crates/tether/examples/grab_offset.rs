//! Grab offset — objects stay where they were grabbed.
//!
//! An offset provider re-anchors each grabbed cube to the hand that picked it
//! up, then clears the anchor on release. The second grab uses settings
//! changed while the provider is enabled.
//!
//! Run with: `RUST_LOG=info cargo run -p tether --example grab_offset`

use tether::prelude::*;

fn main() {
    env_logger::init();

    let mut scene = Scene::new();
    let hand = scene.spawn_named("right_hand", Transform::from_xyz(0.25, 1.1, 0.35));
    let cube = scene.spawn_named("cube", Transform::from_xyz(0.3, 1.0, 0.5));
    let mut rig = Rig::new(scene);

    let interactor = rig.interactions.add_interactor(Interactor::new("right", hand));
    let cube = rig.interactions.add_interactable(Interactable::grab(cube));

    let mut provider = OffsetProvider::new(hand);
    provider.reset(&mut rig.interactions, &rig.scene);
    let provider = rig.add_offset_provider(provider);

    let describe = |rig: &Rig| {
        let Some(grab) = rig.interactions.interactable(cube).and_then(|i| i.attachment()) else {
            return String::from("not grabbable");
        };
        let anchor = rig.scene.name(grab.attach_node()).unwrap_or("?");
        format!(
            "anchored to {anchor}, ease-in {}s, {:?}",
            grab.attach_ease_in_time, grab.movement_type
        )
    };

    log::info!("before grab: {}", describe(&rig));
    rig.interactions.select_enter(interactor, cube);
    log::info!("grabbed: {}", describe(&rig));
    rig.interactions.select_exit(interactor);
    log::info!("released: {}", describe(&rig));

    rig.offset_providers[provider].set_attach_ease_in_time(0.2);
    rig.offset_providers[provider].set_movement_type(MovementType::VelocityTracking);
    rig.interactions.select_enter(interactor, cube);
    log::info!("grabbed again: {}", describe(&rig));

    rig.offset_providers[provider].disable(&mut rig.interactions);
    rig.interactions.select_exit(interactor);
    log::info!("released with provider disabled: {}", describe(&rig));
}
