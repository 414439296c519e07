pub mod card;
pub mod config;
pub mod plan;
pub mod registry;
pub mod service;
pub mod state;
pub mod view;

pub use card::PlanCard;
pub use config::CardConfig;
pub use config::ConfigError;
pub use config::LogLevel;
pub use config::PreviewConfig;
pub use plan::Plan;
pub use plan::Room;
pub use plan::RoomStatus;
pub use plan::VacuumPlan;
pub use registry::Card;
pub use registry::Registry;
pub use registry::RegistryError;
pub use registry::TAG_NAME;
pub use service::Host;
pub use service::RecordingHost;
pub use service::ServiceCall;
pub use service::ServiceError;
pub use state::EntityState;
pub use state::StateSnapshot;
pub use view::UiEvent;
