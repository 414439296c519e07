//! Pure rendering: plan + snapshot in, markup and listener table out.

use crate::plan::Plan;
use crate::plan::Room;
use crate::plan::RoomStatus;
use crate::plan::VacuumPlan;
use crate::service::ServiceCall;
use crate::service::SERVICE_CLEAN_ALL_ENABLED;
use crate::service::SERVICE_STOP_CLEANING;
use crate::state::StateSnapshot;

use super::dom::Element;
use super::dom::EventKind;
use super::dom::Node;
use super::theme::Icon;
use super::theme::ThemeColor;

/// Vacuum state that counts as running.
pub const STATE_CLEANING: &str = "cleaning";

pub const START_BUTTON_ID: &str = "start-btn";
pub const STOP_BUTTON_ID: &str = "stop-btn";

pub const MSG_ENTITY_NOT_FOUND: &str = "Entity not found";
pub const MSG_NOTHING_TO_CLEAN: &str = "Nothing to clean.";
pub const MSG_NO_DEBUG_COMMAND: &str = "No debug command available";

/// What a listener does when its event fires.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Emit a fixed service call.
    CallService(ServiceCall),
    /// Turn a switch on or off according to the toggle's new checked value.
    SetSwitch { entity_id: String },
    /// Show a vacuum's debug command to the user.
    ShowDebug {
        vacuum_id: String,
        command: Option<serde_json::Value>,
    },
}

/// An event binding on a rendered element.
#[derive(Debug, Clone, PartialEq)]
pub struct Listener {
    pub target: String,
    pub event: EventKind,
    pub action: Action,
}

impl Listener {
    fn new(target: impl Into<String>, event: EventKind, action: Action) -> Self {
        Self {
            target: target.into(),
            event,
            action,
        }
    }
}

/// One render's worth of card body plus the listeners bound to it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Content {
    pub body: Vec<Node>,
    pub listeners: Vec<Listener>,
}

impl Content {
    /// A body consisting of a single informational message.
    pub fn message(text: &str) -> Self {
        Self {
            body: vec![Node::from(text)],
            listeners: Vec::new(),
        }
    }
}

/// True iff any vacuum in the plan is currently cleaning.
pub fn any_running(plan: &Plan, snapshot: &StateSnapshot) -> bool {
    plan.vacuum_ids().any(|id| {
        snapshot
            .get(id)
            .is_some_and(|state| state.state == STATE_CLEANING)
    })
}

/// Friendly name of a vacuum, falling back to its entity id.
pub fn display_name<'a>(vacuum_id: &'a str, snapshot: &'a StateSnapshot) -> &'a str {
    snapshot
        .get(vacuum_id)
        .and_then(|state| state.friendly_name())
        .unwrap_or(vacuum_id)
}

/// Icon and color for a room status.
pub fn status_style(status: RoomStatus) -> (Icon, ThemeColor) {
    match status {
        RoomStatus::WillClean => (Icon::CheckCircle, ThemeColor::SuccessColor),
        RoomStatus::Disabled => (Icon::ToggleOff, ThemeColor::SecondaryTextColor),
        RoomStatus::NotReady => (Icon::AlertCircle, ThemeColor::ErrorColor),
        RoomStatus::Idle => (Icon::CircleOutline, ThemeColor::SecondaryTextColor),
    }
}

/// Render a non-empty plan.
pub fn render_plan(plan: &Plan, snapshot: &StateSnapshot, service_domain: &str) -> Content {
    let mut listeners = Vec::new();
    let mut body = Vec::with_capacity(plan.len() + 1);

    let running = any_running(plan, snapshot);
    body.push(render_top_action(running, service_domain, &mut listeners).into());

    for (index, (vacuum_id, vacuum)) in plan.iter().enumerate() {
        let name = display_name(vacuum_id, snapshot);
        body.push(render_vacuum(index, vacuum_id, name, vacuum, &mut listeners).into());
    }

    tracing::debug!(
        "Rendered {} vacuum(s), running={}, {} listener(s)",
        plan.len(),
        running,
        listeners.len()
    );

    Content { body, listeners }
}

fn render_top_action(running: bool, service_domain: &str, listeners: &mut Vec<Listener>) -> Element {
    let button = if running {
        listeners.push(Listener::new(
            STOP_BUTTON_ID,
            EventKind::Click,
            Action::CallService(ServiceCall::new(service_domain, SERVICE_STOP_CLEANING)),
        ));
        action_button(STOP_BUTTON_ID, Icon::Stop, "HOME", ThemeColor::ErrorColor)
    } else {
        listeners.push(Listener::new(
            START_BUTTON_ID,
            EventKind::Click,
            Action::CallService(ServiceCall::new(service_domain, SERVICE_CLEAN_ALL_ENABLED)),
        ));
        action_button(START_BUTTON_ID, Icon::Play, "START", ThemeColor::PrimaryColor)
    };

    Element::new("div")
        .style("position", "absolute")
        .style("top", "12px")
        .style("right", "16px")
        .style("z-index", "1")
        .style("display", "flex")
        .style("gap", "8px")
        .child(button)
}

fn action_button(id: &str, icon: Icon, label: &str, background: ThemeColor) -> Element {
    Element::new("button")
        .id(id)
        .style("background-color", background.var())
        .style("color", ThemeColor::TextPrimaryColor.var())
        .style("border", "none")
        .style("padding", "6px 12px")
        .style("border-radius", "4px")
        .style("cursor", "pointer")
        .style("font-weight", "500")
        .style("display", "flex")
        .style("align-items", "center")
        .style("font-size", "14px")
        .style("text-transform", "uppercase")
        .style("letter-spacing", "0.5px")
        .child(ha_icon(icon).style("margin-right", "6px"))
        .child(label)
}

fn ha_icon(icon: Icon) -> Element {
    Element::new("ha-icon").attr("icon", icon.to_string())
}

fn render_vacuum(
    index: usize,
    vacuum_id: &str,
    name: &str,
    vacuum: &VacuumPlan,
    listeners: &mut Vec<Listener>,
) -> Element {
    let mut header = Element::new("div")
        .style("display", "flex")
        .style("align-items", "center")
        .style("margin-bottom", "4px")
        .child(ha_icon(Icon::RobotVacuum).style("margin-right", "8px"))
        .child(Element::new("strong").class("vacuum-name").child(name))
        .child(
            Element::new("span")
                .class("count-badge")
                .style("margin-left", "auto")
                .style("background", ThemeColor::PrimaryColor.var())
                .style("color", ThemeColor::TextPrimaryColor.var())
                .style("padding", "2px 6px")
                .style("border-radius", "4px")
                .style("font-size", "0.8em")
                .child(vacuum.count.to_string()),
        );

    if vacuum.debug_command.is_some() {
        let id = format!("debug-{}", index);
        listeners.push(Listener::new(
            id.as_str(),
            EventKind::Click,
            Action::ShowDebug {
                vacuum_id: vacuum_id.to_string(),
                command: vacuum.debug_command.clone(),
            },
        ));
        header = header.child(
            ha_icon(Icon::Bug)
                .id(id)
                .class("debug-btn")
                .attr("data-vacuum", vacuum_id)
                .style("margin-left", "8px")
                .style("cursor", "pointer")
                .style("color", ThemeColor::SecondaryTextColor.var()),
        );
    }

    let last = vacuum.rooms.len().saturating_sub(1);
    let rows = vacuum
        .rooms
        .iter()
        .enumerate()
        .map(|(room_index, room)| {
            let key = format!("{}-{}", index, room_index);
            render_room(&key, room, room_index < last, listeners)
        })
        .collect::<Vec<_>>();

    Element::new("div")
        .class("vacuum")
        .attr("data-vacuum", vacuum_id)
        .style("margin-bottom", "10px")
        .child(header)
        .child(
            Element::new("div")
                .class("rooms")
                .style("background", ThemeColor::SecondaryBackgroundColor.var())
                .style("border-radius", "8px")
                .style("padding", "8px")
                .children(rows),
        )
}

fn render_room(key: &str, room: &Room, divider: bool, listeners: &mut Vec<Listener>) -> Element {
    let status = room.status();
    let (icon, color) = status_style(status);
    let border = if divider {
        format!("1px solid {}", ThemeColor::DividerColor.var())
    } else {
        "none".to_string()
    };

    let mut toggles = Element::new("div")
        .style("display", "flex")
        .style("align-items", "center")
        .style("gap", "8px");

    if let Some(entity_id) = &room.switch_entity_id {
        let id = format!("schedule-{}", key);
        listeners.push(switch_listener(&id, entity_id));
        toggles = toggles.child(room_toggle(&id, entity_id, room.enabled, "Schedule"));
    }

    if let Some(entity_id) = &room.disable_entity_id {
        let id = format!("override-{}", key);
        listeners.push(switch_listener(&id, entity_id));
        toggles = toggles.child(
            room_toggle(&id, entity_id, room.disabled_override, "Disable Override")
                .style("--switch-checked-color", ThemeColor::ErrorColor.var()),
        );
    }

    Element::new("div")
        .class("room")
        .attr("data-status", status.to_string())
        .style("display", "flex")
        .style("align-items", "center")
        .style("padding", "8px 0")
        .style("border-bottom", border)
        .child(
            ha_icon(icon)
                .class("room-icon")
                .style("color", color.var())
                .style("margin-right", "12px"),
        )
        .child(
            Element::new("div")
                .style("display", "flex")
                .style("flex-direction", "column")
                .style("flex", "1")
                .child(Element::new("span").class("room-name").child(room.name.as_str()))
                .child(
                    Element::new("span")
                        .class("room-subtext")
                        .style("font-size", "0.8em")
                        .style("color", ThemeColor::SecondaryTextColor.var())
                        .child(room.subtext()),
                ),
        )
        .child(toggles)
}

fn switch_listener(id: &str, entity_id: &str) -> Listener {
    Listener::new(
        id,
        EventKind::Change,
        Action::SetSwitch {
            entity_id: entity_id.to_string(),
        },
    )
}

fn room_toggle(id: &str, entity_id: &str, checked: bool, title: &str) -> Element {
    let toggle = Element::new("ha-switch")
        .id(id)
        .class("room-toggle")
        .attr("data-entity", entity_id)
        .attr("title", title);
    if checked {
        toggle.attr("checked", "")
    } else {
        toggle
    }
}
