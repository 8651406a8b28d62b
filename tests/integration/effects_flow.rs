//! Effect runner driving the controller over the mock gateway.

use std::sync::Arc;
use std::time::Duration;

use kvg_rgb::color::Rgb;
use kvg_rgb::effects::{Effect, EffectState, Palette, Speed};
use kvg_rgb::error::RgbError;
use kvg_rgb::gateway::mock::GatewayOp;
use kvg_rgb::selection::{Scope, ZoneKey};

use crate::common::{fast_runner, init_test_logging, mock_controller};

fn rainbow() -> Effect {
    Effect::Rainbow {
        speed: Speed::try_from(5.0).unwrap(),
    }
}

#[test]
fn timed_rainbow_over_device_restores_colors() {
    init_test_logging();
    let (mock, controller) = mock_controller();
    let snapshot = controller.snapshot().unwrap();
    controller
        .set_color(&snapshot, Scope::Device(1), Rgb::new(0, 0, 80))
        .unwrap();
    mock.clear_operations();

    let runner = fast_runner(controller);
    let handle = runner
        .start(
            &snapshot,
            Scope::Device(1),
            rainbow(),
            Some(Duration::from_millis(60)),
        )
        .unwrap();
    assert_eq!(handle.zones().len(), 4);

    assert_eq!(runner.wait(handle.id()), Some(EffectState::Completed));
    assert!(handle.ticks() > 0);
    for zone in 0..4 {
        assert!(
            mock.zone_colors(1, zone)
                .iter()
                .all(|c| *c == Rgb::new(0, 0, 80)),
            "zone {zone} not restored"
        );
    }
    assert!(mock.writes().iter().all(|op| op.zone().is_none_or(|(d, _)| d == 1)));
}

#[test]
fn effect_frames_are_not_persisted() {
    let (_mock, controller) = mock_controller();
    let snapshot = controller.snapshot().unwrap();
    controller
        .set_color(&snapshot, Scope::Zone(0, 1), Rgb::RED)
        .unwrap();
    let before = controller.store().get(0, 1).unwrap().unwrap();

    let runner = fast_runner(Arc::clone(&controller));
    let handle = runner
        .start(
            &snapshot,
            Scope::Zone(0, 1),
            Effect::Breathing {
                speed: Speed::NORMAL,
                color: Rgb::BLUE,
            },
            Some(Duration::from_millis(40)),
        )
        .unwrap();
    runner.wait(handle.id());

    let after = controller.store().get(0, 1).unwrap().unwrap();
    assert_eq!(after.color, before.color);
    assert_eq!(after.effect, Effect::Static);
    assert_eq!(controller.store().list_recent_colors().unwrap().len(), 1);
}

#[test]
fn assigning_an_effect_persists_and_resumes() {
    let (mock, controller) = mock_controller();
    let snapshot = controller.snapshot().unwrap();
    let wave = Effect::Wave {
        speed: Speed::NORMAL,
        colors: Palette::try_from(vec![Rgb::RED, Rgb::BLUE]).unwrap(),
    };

    {
        let runner = fast_runner(Arc::clone(&controller));
        let (pref, handle) = runner.assign(&snapshot, 1, 2, wave.clone()).unwrap();
        assert_eq!(pref.effect, wave);
        let handle = handle.expect("wave starts a running effect");
        assert_eq!(handle.zones(), vec![ZoneKey::new(1, 2)]);
        assert_eq!(runner.running().len(), 1);
    }

    mock.clear_operations();
    let runner = fast_runner(controller);
    let resumed = runner.resume_stored(&snapshot).unwrap();
    assert_eq!(resumed.len(), 1);
    assert_eq!(resumed[0].zones(), vec![ZoneKey::new(1, 2)]);

    std::thread::sleep(Duration::from_millis(30));
    assert!(mock.operations().iter().any(|op| matches!(
        op,
        GatewayOp::SetZoneLeds {
            device: 1,
            zone: 2,
            ..
        }
    )));
    assert_eq!(runner.stop_all(), 1);
}

#[test]
fn stopping_an_unknown_effect_is_not_found() {
    let (_mock, controller) = mock_controller();
    let runner = fast_runner(controller);
    assert!(matches!(runner.stop(99), Err(RgbError::NotFound(_))));
}

#[test]
fn excluded_device_gets_no_effect() {
    let (_mock, controller) = mock_controller();
    let snapshot = controller.snapshot().unwrap();
    controller.set_device_enabled(&snapshot, 1, false).unwrap();

    let runner = fast_runner(controller);
    let handle = runner.start(&snapshot, Scope::All, rainbow(), None).unwrap();
    assert!(handle.zones().iter().all(|k| k.device == 0));
    assert_eq!(handle.zones().len(), 2);
    runner.stop(handle.id()).unwrap();
}
