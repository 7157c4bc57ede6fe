// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::SyncMessage;

/// An unbounded channel carrying [`SyncMessage`]s to observers.
///
/// Any number of drivers may hold a sender. The owner of the bus drains it.
#[derive(Debug)]
pub struct ReplicationBus {
    sender: flume::Sender<SyncMessage>,
    receiver: flume::Receiver<SyncMessage>,
}

impl ReplicationBus {
    /// Creates a new bus with an unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        log::debug!("Replication bus initialized.");
        Self { sender, receiver }
    }

    /// Sends a message, logging an error if the receiver is gone.
    pub fn publish(&self, message: SyncMessage) {
        log::trace!("Publishing {message:?}");
        if let Err(e) = self.sender.send(message) {
            log::error!("Failed to publish sync message: {e}. Receiver likely disconnected.");
        }
    }

    /// Returns a clone of the sender end of the channel.
    pub fn sender(&self) -> flume::Sender<SyncMessage> {
        self.sender.clone()
    }

    /// Returns a reference to the receiver end of the channel.
    pub fn receiver(&self) -> &flume::Receiver<SyncMessage> {
        &self.receiver
    }

    /// Takes every pending message, in publication order.
    pub fn drain(&self) -> Vec<SyncMessage> {
        self.receiver.try_iter().collect()
    }
}

impl Default for ReplicationBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;
    use flume::{SendError, TryRecvError};
    use std::{thread, time::Duration};

    fn stalled(stalled: bool) -> SyncMessage {
        SyncMessage::StalledFlag {
            driver: EntityId::from_name("driver"),
            stalled,
        }
    }

    #[test]
    fn empty_bus_has_nothing_to_drain() {
        let bus = ReplicationBus::new();
        assert!(bus.drain().is_empty());
        assert_eq!(bus.receiver().try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn drain_preserves_publication_order() {
        let bus = ReplicationBus::new();
        bus.publish(stalled(true));
        bus.sender().send(stalled(false)).expect("Send should succeed");
        bus.publish(SyncMessage::SeatMapping {
            driver: EntityId::from_name("driver"),
            mapping: Default::default(),
        });

        let drained = bus.drain();
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[0], stalled(true));
        assert_eq!(drained[1], stalled(false));
        assert_eq!(drained[2].driver(), EntityId::from_name("driver"));
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn send_from_thread() {
        let bus = ReplicationBus::new();
        let sender = bus.sender();
        let handle = thread::spawn(move || {
            sender.send(stalled(true)).expect("Send from thread failed");
        });

        match bus.receiver().recv_timeout(Duration::from_secs(1)) {
            Ok(message) => assert_eq!(message, stalled(true)),
            Err(e) => panic!("Failed to receive message from thread: {e:?}"),
        }
        handle.join().expect("Thread join failed");
    }

    #[test]
    fn send_error_on_bus_drop() {
        let bus = ReplicationBus::new();
        let sender = bus.sender();
        drop(bus);
        match sender.send(stalled(true)) {
            Err(SendError(_)) => {}
            Ok(()) => panic!("Send unexpectedly succeeded after bus drop"),
        }
    }
}
