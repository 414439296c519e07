//! Custom element registry.
//!
//! Cards register themselves at link time into [`CARD_REGISTRY`]; the host
//! builds a [`Registry`] from it on startup and creates cards by tag name.

use std::collections::BTreeMap;

use linkme::distributed_slice;
use tracing::info;

use crate::service::Host;
use crate::state::StateSnapshot;
use crate::view::UiEvent;

/// Tag name of the cleaning-plan card.
pub const TAG_NAME: &str = "veronika-plan-card";

/// Host-facing interface of a dashboard card.
pub trait Card {
    /// Store the card options. Called before the first state delivery.
    fn configure(&mut self, options: serde_json::Value);

    /// React to a new snapshot of the host's state.
    fn deliver_state(&mut self, snapshot: &StateSnapshot);

    /// Route a user gesture. Returns whether a listener handled it.
    fn dispatch(&mut self, event: &UiEvent, host: &mut dyn Host) -> bool;

    /// Layout size hint used for grid placement.
    fn reported_size(&self) -> u32;

    /// Current markup.
    fn html(&self) -> String;

    /// Current markup, indented one node per line.
    fn pretty_html(&self) -> String;
}

pub type CardFactory = fn() -> Box<dyn Card>;

/// Static registration of a card type.
pub struct CardDefinition {
    pub tag: &'static str,
    pub factory: CardFactory,
}

#[distributed_slice]
pub static CARD_REGISTRY: [CardDefinition];

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Element already defined: {0}")]
    AlreadyDefined(String),
}

/// Tag name -> card factory.
#[derive(Default)]
pub struct Registry {
    definitions: BTreeMap<String, CardFactory>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("tags", &self.definitions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every card linked into the binary.
    pub fn with_builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for definition in CARD_REGISTRY {
            registry.define(definition.tag, definition.factory)?;
        }
        Ok(registry)
    }

    /// Define a tag. Tags can only be defined once.
    pub fn define(&mut self, tag: &str, factory: CardFactory) -> Result<(), RegistryError> {
        if self.definitions.contains_key(tag) {
            return Err(RegistryError::AlreadyDefined(tag.to_string()));
        }
        info!("Defined custom element <{}>", tag);
        self.definitions.insert(tag.to_string(), factory);
        Ok(())
    }

    pub fn is_defined(&self, tag: &str) -> bool {
        self.definitions.contains_key(tag)
    }

    /// Create a fresh instance of the card registered under `tag`.
    pub fn create(&self, tag: &str) -> Option<Box<dyn Card>> {
        self.definitions.get(tag).map(|factory| factory())
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_contains_plan_card() {
        let registry = Registry::with_builtin().unwrap();
        assert!(registry.is_defined(TAG_NAME));

        let card = registry.create(TAG_NAME).unwrap();
        assert_eq!(card.reported_size(), 3);
        assert!(registry.create("unknown-card").is_none());
    }

    #[test]
    fn test_define_twice_fails() {
        let mut registry = Registry::with_builtin().unwrap();
        let factory = registry.definitions[TAG_NAME];
        let err = registry.define(TAG_NAME, factory).unwrap_err();
        assert_eq!(err.to_string(), "Element already defined: veronika-plan-card");
        assert_eq!(registry.tags().count(), 1);
    }
}
