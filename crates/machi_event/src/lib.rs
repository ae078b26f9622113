mod event;
mod event_manager;
mod event_queue;

pub use event::{Event, EventKind, EventType, KeyboardData, Modifiers, MouseButtonData};
pub use event_manager::{EventManager, Subscriber, SubscriberId};
pub use event_queue::EventQueue;
