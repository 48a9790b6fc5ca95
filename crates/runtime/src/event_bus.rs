//! Single-subscriber event delivery.
//!
//! A bus hands its receiving end to exactly one subscriber; any number of
//! [`Emitter`]s may publish into it. Events emitted before the subscriber
//! attaches are queued and delivered in order. Once the bus is closed and
//! every emitter is dropped, the subscription drains and then ends.

use std::cell::RefCell;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::trace;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    #[error("event bus already has a subscriber")]
    AlreadySubscribed,
    #[error("event bus is closed")]
    Closed,
}

#[derive(Debug)]
pub struct EventBus<E> {
    name: &'static str,
    sender: RefCell<Option<mpsc::UnboundedSender<E>>>,
    receiver: RefCell<Option<mpsc::UnboundedReceiver<E>>>,
}

impl<E> EventBus<E> {
    pub fn new(name: &'static str) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            name,
            sender: RefCell::new(Some(tx)),
            receiver: RefCell::new(Some(rx)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Attach the one and only subscriber.
    pub fn subscribe(&self) -> Result<Subscription<E>, BusError> {
        let rx = self
            .receiver
            .borrow_mut()
            .take()
            .ok_or(BusError::AlreadySubscribed)?;
        trace!(bus = self.name, "subscriber attached");
        Ok(Subscription { rx })
    }

    pub fn emitter(&self) -> Result<Emitter<E>, BusError> {
        let sender = self.sender.borrow();
        let tx = sender.as_ref().ok_or(BusError::Closed)?;
        Ok(Emitter {
            name: self.name,
            tx: tx.clone(),
        })
    }

    /// Publish directly from the bus. Returns `false` if nothing can receive it.
    pub fn emit(&self, event: E) -> bool {
        match self.sender.borrow().as_ref() {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }

    /// Drop the bus-owned sender. Outstanding emitters keep working.
    pub fn close(&self) {
        if self.sender.borrow_mut().take().is_some() {
            trace!(bus = self.name, "closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.borrow().is_none()
    }
}

#[derive(Debug)]
pub struct Emitter<E> {
    name: &'static str,
    tx: mpsc::UnboundedSender<E>,
}

impl<E> Clone for Emitter<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            tx: self.tx.clone(),
        }
    }
}

impl<E> Emitter<E> {
    /// Returns `false` once the subscriber is gone.
    pub fn emit(&self, event: E) -> bool {
        let delivered = self.tx.send(event).is_ok();
        if !delivered {
            trace!(bus = self.name, "event dropped, subscriber gone");
        }
        delivered
    }
}

#[derive(Debug)]
pub struct Subscription<E> {
    rx: mpsc::UnboundedReceiver<E>,
}

impl<E> Subscription<E> {
    /// Next event, or `None` once the bus is closed and drained.
    pub async fn next(&mut self) -> Option<E> {
        self.rx.recv().await
    }

    pub fn try_next(&mut self) -> Option<E> {
        self.rx.try_recv().ok()
    }
}
