//=========================================================================
// Event Queue
//=========================================================================
//
// Pending-event queue between event producers (platform layer, tests,
// tools) and the frame driver.
//
// Producers hold cheap `EventSender` clones. The driver drains the whole
// queue at the start of every frame, in arrival order.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::warn;

//=== Internal Dependencies ===============================================

use super::Event;

//=== EventSender =========================================================

/// Producer handle for an [`EventQueue`].
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: Sender<Event>,
}

impl EventSender {
    /// Queues an event for the next frame.
    ///
    /// Returns false if the queue has been dropped. The event is discarded
    /// and a warning is logged; producers keep running so the window can
    /// still be closed normally.
    pub fn send(&self, event: Event) -> bool {
        match self.sender.send(event) {
            Ok(()) => true,
            Err(e) => {
                warn!(target: "input", "Event queue disconnected, dropping {:?}", e.0);
                false
            }
        }
    }
}

//=== EventQueue ==========================================================

/// FIFO of events waiting to be handled by the current scene.
#[derive(Debug)]
pub struct EventQueue {
    sender: Sender<Event>,
    receiver: Receiver<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Returns a producer handle.
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Queues an event directly.
    pub fn push(&self, event: Event) {
        // The queue holds its own receiver, so the channel cannot be disconnected here.
        let _ = self.sender.send(event);
    }

    /// Takes every pending event, oldest first.
    pub fn drain(&self) -> Vec<Event> {
        self.receiver.try_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;

    #[test]
    fn drain_returns_events_in_arrival_order() {
        let queue = EventQueue::new();
        queue.push(Event::key_down(KeyCode::KeyA));
        queue.push(Event::resize(10, 10));
        queue.push(Event::Quit);

        let drained = queue.drain();
        assert_eq!(
            drained,
            vec![Event::key_down(KeyCode::KeyA), Event::resize(10, 10), Event::Quit]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn sender_clones_feed_same_queue() {
        let queue = EventQueue::new();
        let a = queue.sender();
        let b = a.clone();

        assert!(a.send(Event::User { code: 1 }));
        assert!(b.send(Event::User { code: 2 }));

        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.drain(),
            vec![Event::User { code: 1 }, Event::User { code: 2 }]
        );
    }

    #[test]
    fn send_after_queue_dropped_reports_failure() {
        let queue = EventQueue::new();
        let sender = queue.sender();
        drop(queue);

        // Should not panic, just log a warning
        assert!(!sender.send(Event::Quit));
    }

    #[test]
    fn drain_on_empty_queue_is_empty() {
        let queue = EventQueue::default();
        assert!(queue.drain().is_empty());
    }
}
