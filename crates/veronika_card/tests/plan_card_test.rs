use serde_json::json;
use veronika_card::EntityState;
use veronika_card::PlanCard;
use veronika_card::RecordingHost;
use veronika_card::Registry;
use veronika_card::ServiceCall;
use veronika_card::StateSnapshot;
use veronika_card::UiEvent;
use veronika_card::TAG_NAME;

const DEMO_STATES: &str = include_str!("../../../demos/states.json");

#[test]
fn test_demo_snapshot_end_to_end() {
    // Keep the card module linked so its registration is visible.
    let _ = PlanCard::new();

    let registry = Registry::with_builtin().unwrap();
    let mut card = registry.create(TAG_NAME).unwrap();
    card.configure(json!({"type": "custom:veronika-plan-card"}));

    let snapshot = StateSnapshot::from_json(DEMO_STATES).unwrap();
    card.deliver_state(&snapshot);

    let html = card.html();
    assert!(html.starts_with("<ha-card header=\"Cleaning Plan\">"));
    assert!(html.contains("START"));
    assert!(!html.contains("HOME"));

    // Friendly name where available, raw id otherwise, in plan order.
    let roborock = html.find("Roborock S7").unwrap();
    let dreame = html.find("vacuum.dreame_l10").unwrap();
    assert!(roborock < dreame);

    let mut host = RecordingHost::new();
    assert!(card.dispatch(&UiEvent::click("start-btn"), &mut host));
    assert!(card.dispatch(&UiEvent::change("override-1-0", false), &mut host));
    assert!(card.dispatch(&UiEvent::click("debug-0"), &mut host));

    assert_eq!(
        host.calls,
        [
            ServiceCall::new("veronika", "clean_all_enabled"),
            ServiceCall::switch("switch.veronika_disable_office", false),
        ]
    );
    assert_eq!(host.alerts.len(), 1);
    assert!(host.alerts[0].contains("\"command\": \"app_segment_clean\""));
}

#[test]
fn test_host_driven_update_cycle() {
    let mut card = PlanCard::new();
    card.configure(json!({}));

    let mut snapshot = StateSnapshot::from_json(DEMO_STATES).unwrap();
    card.deliver_state(&snapshot);
    assert_eq!(card.render_count(), 1);

    // Unrelated entity changes: the plan sensor keeps its identity.
    snapshot.insert("light.hall", EntityState::new("on"));
    card.deliver_state(&snapshot);
    assert_eq!(card.render_count(), 1);

    // The sensor republishes, and the vacuum is now running.
    let sensor = EntityState::clone(snapshot.get("sensor.veronika_cleaning_plan").unwrap());
    snapshot.insert("sensor.veronika_cleaning_plan", sensor);
    snapshot.insert("vacuum.dreame_l10", EntityState::new("cleaning"));
    card.deliver_state(&snapshot);
    assert_eq!(card.render_count(), 2);
    assert!(card.html().contains("HOME"));

    let mut host = RecordingHost::new();
    card.dispatch(&UiEvent::click("stop-btn"), &mut host);
    assert_eq!(host.calls, [ServiceCall::new("veronika", "stop_cleaning")]);

    // The sensor disappears entirely.
    card.deliver_state(&StateSnapshot::new());
    assert!(card.html().contains(">Entity not found<"));
}
