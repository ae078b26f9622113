use anyhow::Result;
use machi_core::{Handle, HandleAllocator};
use machi_log::{error, trace, Logger};

use crate::{Event, EventQueue};

/// Marker for subscriber handles.
pub struct Subscriber;

pub type SubscriberId = Handle<Subscriber>;

type BoxedHandler = Box<dyn FnMut(&Event, &mut EventQueue) -> Result<()>>;

/// Queues events and hands them to every subscriber once per dispatch.
///
/// Events posted with [`EventManager::post_event`] wait until the next
/// [`EventManager::dispatch`]. Handlers get a queue of their own to push
/// follow-up events into; those are delivered by the *next* dispatch, never
/// by the one in progress.
pub struct EventManager {
    queue: EventQueue,
    deferred: EventQueue,
    subscribers: Vec<(SubscriberId, BoxedHandler)>,
    ids: HandleAllocator<Subscriber>,
    logger: Logger,
}

impl EventManager {
    pub fn new(logger: Logger) -> Self {
        Self {
            queue: EventQueue::new(),
            deferred: EventQueue::new(),
            subscribers: Vec::new(),
            ids: HandleAllocator::new(),
            logger: logger.scoped("Events"),
        }
    }

    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: FnMut(&Event, &mut EventQueue) -> Result<()> + 'static,
    {
        let id = self.ids.allocate();
        self.subscribers.push((id, Box::new(handler)));
        trace!(self.logger, "Added subscriber {}", id.as_raw());
        id
    }

    /// Returns `false` when `id` is not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(subscriber, _)| *subscriber != id);
        before != self.subscribers.len()
    }

    pub fn post_event(&mut self, event: Event) {
        self.queue.push_event(event);
    }

    /// The pending queue, for producers that push many events at once.
    pub fn queue_mut(&mut self) -> &mut EventQueue {
        &mut self.queue
    }

    /// Delivers queued events in posting order, each one to every subscriber
    /// in subscription order. Returns the number of events delivered.
    ///
    /// Events posted by handlers during the previous dispatch come first.
    /// The pending queue is empty afterwards whatever the handlers do.
    pub fn dispatch(&mut self) -> usize {
        let mut events = self.deferred.take();
        events.append(&mut self.queue.take());

        for event in events.iter() {
            for (id, handler) in self.subscribers.iter_mut() {
                if let Err(err) = handler(event, &mut self.deferred) {
                    error!(
                        self.logger,
                        "Subscriber {} failed to handle {}: {err:#}",
                        id.as_raw(),
                        event.event_type()
                    );
                }
            }
        }

        events.len()
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
        self.deferred.clear();
    }

    /// Events waiting in the pending queue.
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Events posted by handlers, held for the next dispatch.
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    pub fn subscriber_len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn clear_subscribers(&mut self) {
        self.subscribers.clear();
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new(Logger::disabled())
    }
}
