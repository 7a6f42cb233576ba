//=========================================================================
// Listener Chain
//=========================================================================
//
// Type-erased storage for per-event listener chains, so chains with
// different payload types can share one HashMap.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use super::listener::Listener;
use super::signature::{Payload, Signature};

//=========================================================================

/// Type-erased view of a [`Chain`].
///
/// Exposes the locked-in signature and length without knowing the
/// payload type; typed access goes through the `Any` downcasts.
pub(super) trait ListenerChain: Send {
    /// Signature fixed when the chain was created.
    fn signature(&self) -> &Signature;

    /// Number of listeners in the chain.
    fn len(&self) -> usize;

    /// Returns true if the chain holds no listeners.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

//=========================================================================

/// Ordered listeners for one event, all sharing payload type `P`.
pub(super) struct Chain<P: Payload> {
    signature: Signature,
    listeners: Vec<Listener<P>>,
}

impl<P: Payload> Chain<P> {
    /// Starts a chain with a single listener.
    pub fn with_listener(listener: Listener<P>) -> Self {
        Self {
            signature: P::signature(),
            listeners: vec![listener],
        }
    }

    /// Appends to the end of the chain.
    pub fn push(&mut self, listener: Listener<P>) {
        self.listeners.push(listener);
    }

    /// Removes one occurrence of `listener`, the most recently added one.
    ///
    /// Returns the removed handle, or `None` if it was not in the chain.
    pub fn remove(&mut self, listener: &Listener<P>) -> Option<Listener<P>> {
        let pos = self.listeners.iter().rposition(|l| l == listener)?;
        Some(self.listeners.remove(pos))
    }

    /// Copies the current listeners for dispatch outside the registry lock.
    pub fn snapshot(&self) -> Vec<Listener<P>> {
        self.listeners.clone()
    }
}

impl<P: Payload> ListenerChain for Chain<P> {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn len(&self) -> usize {
        self.listeners.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=========================================================================
// Tests
//=========================================================================
