use std::sync::mpsc;

use cobble_shared::block::BlockId;
use glam::IVec3;

/// Notifications raised for renderers, network sync and other listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum UserEvent {
    BlockChanged {
        pos: IVec3,
        old: BlockId,
        new: BlockId,
    },
    HeldBlockChanged,
    ViewDistanceChanged(i32),
    FovChanged(i32),
    ChatSubmitted(String),
}

pub struct EventSender<T> {
    tx: mpsc::Sender<T>,
}

pub struct EventReceiver<T> {
    rx: mpsc::Receiver<T>,
}

pub fn channel<T>() -> (EventSender<T>, EventReceiver<T>) {
    let (tx, rx) = mpsc::channel();
    (EventSender { tx }, EventReceiver { rx })
}

impl<T> Clone for EventSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T: std::fmt::Debug> EventSender<T> {
    /// Raises `event`. Nobody listening is not an error for the raiser.
    pub fn raise(&self, event: T) {
        if let Err(err) = self.tx.send(event) {
            tracing::debug!("dropped event with no listener: {:?}", err.0);
        }
    }
}

impl<T> EventReceiver<T> {
    pub fn try_recv(&self) -> Result<T, mpsc::TryRecvError> {
        self.rx.try_recv()
    }

    /// Everything raised since the last drain, oldest first.
    pub fn drain(&self) -> Vec<T> {
        self.rx.try_iter().collect()
    }
}
