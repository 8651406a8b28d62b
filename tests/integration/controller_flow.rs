//! Controller behaviour across process restarts.

use std::sync::Arc;

use tempfile::TempDir;

use kvg_rgb::color::{Adjustment, Rgb};
use kvg_rgb::error::RgbError;
use kvg_rgb::gateway::ColorTarget;
use kvg_rgb::gateway::mock::{GatewayOp, MockGateway};
use kvg_rgb::selection::Scope;
use kvg_rgb::store::PreferenceStore;

use crate::common::{controller_with_store, init_test_logging, mock_controller};

#[test]
fn stored_colors_are_restored_after_restart() {
    init_test_logging();
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("prefs.db");

    {
        let mock = Arc::new(MockGateway::sample());
        let controller = controller_with_store(&mock, PreferenceStore::open(&db).unwrap());
        let snapshot = controller.snapshot().unwrap();
        controller
            .set_brightness_saturation(&snapshot, 1, 0, Some(50), None)
            .unwrap();
        controller
            .set_color(&snapshot, Scope::Zone(1, 0), Rgb::RED)
            .unwrap();
    }

    let mock = Arc::new(MockGateway::sample());
    let controller = controller_with_store(&mock, PreferenceStore::open(&db).unwrap());
    let snapshot = controller.snapshot().unwrap();
    let restored = controller.restore_static_colors(&snapshot).unwrap();

    assert_eq!(restored, 1);
    mock.assert_contains(&GatewayOp::SetDirectMode { device: 1 });
    mock.assert_contains(&GatewayOp::SetColor {
        target: ColorTarget::Zone(1, 0),
        color: Adjustment::clamped(50, 100).apply(Rgb::RED),
    });

    let pref = controller.store().get(1, 0).unwrap().unwrap();
    assert_eq!(pref.color, Some(Rgb::RED));
    assert_eq!(pref.brightness, 50);
}

#[test]
fn excluded_device_is_skipped_after_restart() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("prefs.db");

    {
        let mock = Arc::new(MockGateway::sample());
        let controller = controller_with_store(&mock, PreferenceStore::open(&db).unwrap());
        let snapshot = controller.snapshot().unwrap();
        controller.set_device_enabled(&snapshot, 1, false).unwrap();
    }

    let mock = Arc::new(MockGateway::sample());
    let controller = controller_with_store(&mock, PreferenceStore::open(&db).unwrap());
    let snapshot = controller.snapshot().unwrap();
    let report = controller.set_color(&snapshot, Scope::All, Rgb::BLUE).unwrap();

    assert!(report.zones.iter().all(|z| z.device != 1));
    assert_eq!(report.zones.len(), 2);
    assert_eq!(report.zoneless_devices, vec![2]);
    assert!(mock.writes().iter().all(|op| op.zone().is_none_or(|(d, _)| d != 1)));
    assert!(!mock.writes().contains(&GatewayOp::SetDirectMode { device: 1 }));

    let err = controller
        .set_color(&snapshot, Scope::Device(1), Rgb::BLUE)
        .unwrap_err();
    assert!(matches!(err, RgbError::Validation(_)));
    assert_eq!(
        controller.store().disabled_devices().unwrap(),
        vec!["ARGB Controller".to_string()]
    );
}

#[test]
fn resize_is_persisted_and_reflected_in_overview() {
    let (mock, controller) = mock_controller();
    let snapshot = controller.snapshot().unwrap();
    controller
        .set_color(&snapshot, Scope::Zone(1, 3), Rgb::GREEN)
        .unwrap();
    mock.clear_operations();

    let report = controller.resize_zone(&snapshot, 1, 3, 64).unwrap();
    assert_eq!((report.previous, report.actual), (40, 64));
    mock.assert_contains(&GatewayOp::ResizeZone {
        device: 1,
        zone: 3,
        size: 64,
    });
    mock.assert_contains(&GatewayOp::SetColor {
        target: ColorTarget::Zone(1, 3),
        color: Rgb::GREEN,
    });
    assert_eq!(controller.store().get(1, 3).unwrap().unwrap().led_count, Some(64));

    let fresh = controller.snapshot().unwrap();
    let overview = controller.overview(&fresh).unwrap();
    assert_eq!(overview[1].zones[3].led_count, 64);
    assert_eq!(overview[1].zones[3].color, Some(Rgb::GREEN));
}

#[test]
fn recent_colors_keep_newest_first_and_respect_limit() {
    let mock = Arc::new(MockGateway::sample());
    let store = PreferenceStore::in_memory().unwrap().with_recent_limit(3);
    let controller = controller_with_store(&mock, store);
    let snapshot = controller.snapshot().unwrap();

    for color in [Rgb::RED, Rgb::GREEN, Rgb::BLUE, Rgb::WHITE, Rgb::GREEN] {
        controller
            .set_color(&snapshot, Scope::Zone(0, 1), color)
            .unwrap();
    }

    let recent: Vec<Rgb> = controller
        .store()
        .list_recent_colors()
        .unwrap()
        .into_iter()
        .map(|c| c.color)
        .collect();
    assert_eq!(recent, vec![Rgb::GREEN, Rgb::WHITE, Rgb::BLUE]);
}

#[test]
fn flash_leaves_the_stored_color_on_the_zone() {
    let (mock, controller) = mock_controller();
    let snapshot = controller.snapshot().unwrap();
    controller
        .set_color(&snapshot, Scope::Zone(0, 1), Rgb::new(10, 20, 30))
        .unwrap();

    controller.flash(&snapshot, 0, 1, 2).unwrap();

    assert!(
        mock.zone_colors(0, 1)
            .iter()
            .all(|c| *c == Rgb::new(10, 20, 30))
    );
}

#[test]
fn gateway_outage_keeps_preferences_and_recovers() {
    let (mock, controller) = mock_controller();
    let snapshot = controller.snapshot().unwrap();

    mock.disconnect();
    let err = controller
        .set_color(&snapshot, Scope::Zone(1, 1), Rgb::BLUE)
        .unwrap_err();
    assert!(err.is_connection_lost());
    assert_eq!(err.exit_code(), 4);
    assert_eq!(
        controller.store().get(1, 1).unwrap().unwrap().color,
        Some(Rgb::BLUE)
    );

    mock.reconnect();
    let snapshot = controller.snapshot().unwrap();
    assert_eq!(controller.restore_static_colors(&snapshot).unwrap(), 1);
    assert!(mock.zone_colors(1, 1).iter().all(|c| *c == Rgb::BLUE));
}
