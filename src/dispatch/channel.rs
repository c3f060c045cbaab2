//! Dispatcher that forwards commands over a channel

use super::{Command, CommandSink};
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, warn};

/// Sends every command to whoever holds the matching [`Receiver`].
///
/// A disconnected receiver is logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct ChannelDispatcher {
    tx: Sender<Command>,
}

impl ChannelDispatcher {
    /// Create a dispatcher and the receiver that drains it
    #[must_use]
    pub fn new() -> (Self, Receiver<Command>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    /// Wrap an existing sender
    #[must_use]
    pub const fn from_sender(tx: Sender<Command>) -> Self {
        Self { tx }
    }
}

impl CommandSink for ChannelDispatcher {
    fn send_command(&mut self, command: Command) {
        let kind = command.kind();
        if self.tx.send(command).is_ok() {
            debug!(command = kind, "Dispatched command");
        } else {
            warn!(command = kind, "Command receiver disconnected, dropping");
        }
    }
}
