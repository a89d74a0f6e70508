// Event-driven architecture components
//
// Inbound poll events are published per room on the EventBus and consumed by
// one RoomSubscription per room, which hands them to a RoomEventHandler.

// Public API - what other modules can use
pub use bus::{EmitError, EventBus, DEFAULT_ROOM_CAPACITY};
pub use events::RoomEvent;
pub use room_handler::{RoomEventError, RoomEventHandler};
pub use room_subscription::RoomSubscription;

// Internal modules
mod bus;
mod events;
mod room_handler;
mod room_subscription;
