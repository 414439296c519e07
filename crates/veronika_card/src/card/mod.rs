//! The cleaning-plan card.
//!
//! The host drives the card through two calls: [`PlanCard::configure`] once,
//! then [`PlanCard::deliver_state`] on every state change. User gestures come
//! back through [`PlanCard::dispatch`], which turns them into service calls on
//! the host. The card keeps no model of its own beyond the configuration and
//! the identity of the last plan-sensor state it rendered.

use std::sync::Arc;

use linkme::distributed_slice;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::config::CardConfig;
use crate::plan::Plan;
use crate::registry::Card;
use crate::registry::CardDefinition;
use crate::registry::CARD_REGISTRY;
use crate::registry::TAG_NAME;
use crate::service::Host;
use crate::service::ServiceCall;
use crate::state::EntityState;
use crate::state::StateSnapshot;
use crate::view::render;
use crate::view::Action;
use crate::view::Content;
use crate::view::Element;
use crate::view::Listener;
use crate::view::UiEvent;


/// Layout size hint reported to the host.
pub const CARD_SIZE: u32 = 3;

/// The card's DOM: a header card wrapping a padded content container.
#[derive(Debug)]
struct Shell {
    card: Element,
    content: Element,
    listeners: Vec<Listener>,
}

impl Shell {
    fn new(title: &str) -> Self {
        Self {
            card: Element::new("ha-card").attr("header", title),
            content: Element::new("div").style("padding", "0 16px 16px"),
            listeners: Vec::new(),
        }
    }

    fn to_element(&self) -> Element {
        self.card.clone().child(self.content.clone())
    }
}

#[derive(Debug, Default)]
pub struct PlanCard {
    config: CardConfig,

    /// Plan-sensor state of the last render, compared by pointer.
    last_state: Option<Arc<EntityState>>,

    shell: Option<Shell>,
    renders: u64,
}

#[distributed_slice(CARD_REGISTRY)]
static PLAN_CARD: CardDefinition = CardDefinition {
    tag: TAG_NAME,
    factory: new_plan_card,
};

fn new_plan_card() -> Box<dyn Card> {
    Box::new(PlanCard::new())
}

impl PlanCard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the card options. Any JSON is accepted.
    ///
    /// Reconfiguring an already built card updates its header; the content
    /// follows on the next delivery.
    pub fn configure(&mut self, options: serde_json::Value) {
        self.config = CardConfig::from_value(options);
        if let Some(shell) = self.shell.as_mut() {
            shell.card.set_attr("header", self.config.title());
        }
        debug!("Configured for entity {}", self.config.entity());
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    /// React to a new host state snapshot.
    pub fn deliver_state(&mut self, snapshot: &StateSnapshot) {
        if self.shell.is_none() {
            self.shell = Some(Shell::new(self.config.title()));
        }

        let Some(state) = snapshot.get(self.config.entity()) else {
            // Forget the fingerprint so the entity reappearing always renders.
            self.last_state = None;
            self.apply(Content::message(render::MSG_ENTITY_NOT_FOUND));
            return;
        };

        if self
            .last_state
            .as_ref()
            .is_some_and(|last| Arc::ptr_eq(last, state))
        {
            trace!("Plan sensor unchanged, skipping render");
            return;
        }
        self.last_state = Some(Arc::clone(state));

        let plan = Plan::from_entity(state);
        if plan.is_empty() {
            self.apply(Content::message(render::MSG_NOTHING_TO_CLEAN));
            return;
        }

        let content = render::render_plan(&plan, snapshot, self.config.service_domain());
        self.apply(content);
    }

    /// Replace the content wholesale.
    fn apply(&mut self, content: Content) {
        let Some(shell) = self.shell.as_mut() else {
            return;
        };
        shell.content.replace_children(content.body);
        shell.listeners = content.listeners;
        self.renders += 1;
    }

    /// Route a user gesture through the current listener table.
    ///
    /// Returns `false` when nothing is bound to the event's target.
    pub fn dispatch(&mut self, event: &UiEvent, host: &mut dyn Host) -> bool {
        let action = self.shell.as_ref().and_then(|shell| {
            shell
                .listeners
                .iter()
                .find(|l| l.target == event.target() && l.event == event.kind())
                .map(|l| l.action.clone())
        });

        let Some(action) = action else {
            debug!("No listener for {:?}", event);
            return false;
        };

        match action {
            Action::CallService(call) => send(host, call),
            Action::SetSwitch { entity_id } => {
                let UiEvent::Change { target, checked } = event else {
                    return false;
                };
                self.set_toggle_checked(target, *checked);
                send(host, ServiceCall::switch(entity_id, *checked));
            }
            Action::ShowDebug { vacuum_id, command } => {
                let message = match command {
                    Some(command) => serde_json::to_string_pretty(&command)
                        .unwrap_or_else(|_| command.to_string()),
                    None => render::MSG_NO_DEBUG_COMMAND.to_string(),
                };
                debug!("Showing debug command for {}", vacuum_id);
                host.alert(&message);
            }
        }
        true
    }

    /// Optimistically reflect a flipped toggle until the host confirms it.
    fn set_toggle_checked(&mut self, target: &str, checked: bool) {
        let Some(toggle) = self
            .shell
            .as_mut()
            .and_then(|shell| shell.content.find_by_id_mut(target))
        else {
            return;
        };
        if checked {
            toggle.set_attr("checked", "");
        } else {
            toggle.remove_attr("checked");
        }
    }

    pub fn reported_size(&self) -> u32 {
        CARD_SIZE
    }

    /// Full card markup, or an empty string before the first delivery.
    pub fn html(&self) -> String {
        self.element().map(|e| e.to_html()).unwrap_or_default()
    }

    pub fn pretty_html(&self) -> String {
        self.element()
            .map(|e| e.to_pretty_html())
            .unwrap_or_default()
    }

    /// Full card tree, if it has been built.
    pub fn element(&self) -> Option<Element> {
        self.shell.as_ref().map(Shell::to_element)
    }

    /// The content container, if it has been built.
    pub fn content(&self) -> Option<&Element> {
        self.shell.as_ref().map(|shell| &shell.content)
    }

    pub fn listeners(&self) -> &[Listener] {
        self.shell
            .as_ref()
            .map(|shell| shell.listeners.as_slice())
            .unwrap_or_default()
    }

    /// Number of times the content has been replaced.
    pub fn render_count(&self) -> u64 {
        self.renders
    }
}

/// Fire and forget: the next snapshot reflects whatever the host did.
fn send(host: &mut dyn Host, call: ServiceCall) {
    debug!("Calling service {}", call);
    if let Err(e) = host.call_service(call) {
        warn!("Service call failed: {}", e);
    }
}

impl Card for PlanCard {
    fn configure(&mut self, options: serde_json::Value) {
        PlanCard::configure(self, options)
    }

    fn deliver_state(&mut self, snapshot: &StateSnapshot) {
        PlanCard::deliver_state(self, snapshot)
    }

    fn dispatch(&mut self, event: &UiEvent, host: &mut dyn Host) -> bool {
        PlanCard::dispatch(self, event, host)
    }

    fn reported_size(&self) -> u32 {
        PlanCard::reported_size(self)
    }

    fn html(&self) -> String {
        PlanCard::html(self)
    }

    fn pretty_html(&self) -> String {
        PlanCard::pretty_html(self)
    }
}
