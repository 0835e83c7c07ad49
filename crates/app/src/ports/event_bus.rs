//! Event bus port: publish/subscribe for domain events.

use orchard_domain::error::OrchardError;
use orchard_domain::event::Event;

/// Publishes domain events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    ///
    /// # Errors
    ///
    /// Implementations return an error when the event cannot be delivered.
    fn publish(&self, event: Event) -> Result<(), OrchardError>;
}

impl<T: EventPublisher> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> Result<(), OrchardError> {
        (**self).publish(event)
    }
}

impl<T: EventPublisher> EventPublisher for &T {
    fn publish(&self, event: Event) -> Result<(), OrchardError> {
        (**self).publish(event)
    }
}
