//=========================================================================
// Event Dispatcher
//=========================================================================
//
// Typed publish/subscribe registry for in-process communication by
// named event.
//
// Architecture:
//   subscribe<P>(E, &Listener<P>) → HashMap<E, Box<dyn ListenerChain>>
//                                        │  (signature locked per event)
//   publish<P>(E, P) ── snapshot chain ──┘──→ listeners, in order
//                                        │
//   cleanup() ── retain permanent ───────┘
//
// Lifecycle per event:
//   Absent ──subscribe──> Active(signature, chain)
//   Active ──unsubscribe to empty──> Absent
//   Active ──cleanup, not permanent──> Absent
//   Active ──cleanup, permanent──> Active
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, info, warn};
use parking_lot::Mutex;

//=== Module Declarations =================================================

mod chain;
mod config;
mod error;
mod listener;
mod signature;

//=== Internal Dependencies ===============================================

use chain::{Chain, ListenerChain};

//=== Public API ==========================================================

pub use config::{DispatcherBuilder, DispatcherConfig};
pub use error::{DispatchError, Operation};
pub use listener::{Listener, ListenerId, ListenerResult};
pub use signature::{ParamType, Payload, Signature};

//=== Event Key Trait =====================================================

/// Marker trait for event identifiers.
///
/// Typically implemented by a game-specific enum.
pub trait EventKey: Clone + Copy + Eq + Hash + Debug + Send + Sync + 'static {}

//=== Registry ============================================================

struct Registry<E: EventKey> {
    table: HashMap<E, Box<dyn ListenerChain>>,
    permanent: HashSet<E>,
}

impl<E: EventKey> Registry<E> {
    fn new() -> Self {
        Self {
            table: HashMap::new(),
            permanent: HashSet::new(),
        }
    }
}

fn conflict<E: EventKey>(
    event: E,
    operation: Operation,
    registered: &dyn ListenerChain,
    attempted: Signature,
) -> DispatchError {
    DispatchError::SignatureConflict {
        event: format!("{:?}", event),
        operation,
        registered: registered.signature().clone(),
        attempted,
    }
}

//=== EventDispatcher =====================================================

/// Typed publish/subscribe registry.
///
/// Each event accepts listeners of exactly one payload signature at a
/// time: the first subscriber locks it in and it is released once the
/// chain drains. Events marked permanent keep their listeners across
/// [`cleanup`](Self::cleanup).
///
/// All state sits behind one mutex that is never held while listeners
/// run, so listeners may call back into the dispatcher. Share it with
/// `Arc` when listeners need to do so.
///
/// # Examples
///
/// ```
/// use aetheric_messenger::core::dispatcher::{EventDispatcher, EventKey, Listener};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum GameEvent { ScoreChanged }
/// impl EventKey for GameEvent {}
///
/// let dispatcher = EventDispatcher::new();
/// let on_score = Listener::unary(|score: &i32| {
///     assert_eq!(*score, 42);
///     Ok(())
/// });
///
/// dispatcher.subscribe(GameEvent::ScoreChanged, &on_score)?;
/// dispatcher.publish(GameEvent::ScoreChanged, (42,))?;
///
/// // Wrong payload shape is rejected.
/// assert!(dispatcher.publish(GameEvent::ScoreChanged, ("42",)).is_err());
/// # Ok::<(), aetheric_messenger::core::dispatcher::DispatchError>(())
/// ```
pub struct EventDispatcher<E: EventKey> {
    registry: Mutex<Registry<E>>,
    config: DispatcherConfig,
}

impl<E: EventKey> EventDispatcher<E> {
    //--- Construction -----------------------------------------------------

    /// Creates an empty dispatcher with default configuration.
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    /// Creates an empty dispatcher with the given configuration.
    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            registry: Mutex::new(Registry::new()),
            config,
        }
    }

    /// Fluent construction, see [`DispatcherBuilder`].
    pub fn builder() -> DispatcherBuilder<E> {
        DispatcherBuilder::new()
    }

    /// Active configuration.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    //--- Subscription -----------------------------------------------------

    /// Appends `listener` to the chain for `event`.
    ///
    /// Creates the entry if absent, locking in the listener's signature.
    ///
    /// # Errors
    ///
    /// [`DispatchError::SignatureConflict`] if `event` already has
    /// listeners of a different signature. The registry is not modified.
    pub fn subscribe<P: Payload>(
        &self,
        event: E,
        listener: &Listener<P>,
    ) -> Result<(), DispatchError> {
        if self.config.log_subscriptions {
            debug!(
                "Subscribing listener {:?} to {:?} with {}",
                listener.id(),
                event,
                listener.signature()
            );
        }

        let mut registry = self.registry.lock();
        match registry.table.entry(event) {
            Entry::Vacant(slot) => {
                slot.insert(Box::new(Chain::with_listener(listener.clone())));
            }
            Entry::Occupied(mut slot) => {
                let attempted = P::signature();
                if slot.get().signature() != &attempted {
                    return Err(conflict(event, Operation::Subscribe, slot.get().as_ref(), attempted));
                }

                let Some(chain) = slot.get_mut().as_any_mut().downcast_mut::<Chain<P>>() else {
                    return Err(conflict(event, Operation::Subscribe, slot.get().as_ref(), attempted));
                };
                chain.push(listener.clone());
            }
        }

        Ok(())
    }

    /// Removes one occurrence of `listener` from the chain for `event`.
    ///
    /// Removal matches by [`ListenerId`]; if the listener occurs more than
    /// once, the most recently added occurrence goes. A chain that drains
    /// to empty deletes the entry, permanent or not. Removing a listener
    /// that is not in the chain is a no-op.
    ///
    /// # Errors
    ///
    /// Checked in order:
    /// - [`DispatchError::UnknownEvent`] if `event` has no entry.
    /// - [`DispatchError::EmptyChain`] if the entry holds no listeners.
    /// - [`DispatchError::SignatureConflict`] if the listener's signature
    ///   differs from the event's. The chain is not modified.
    pub fn unsubscribe<P: Payload>(
        &self,
        event: E,
        listener: &Listener<P>,
    ) -> Result<(), DispatchError> {
        if self.config.log_lifecycle {
            debug!("Unsubscribing listener {:?} from {:?}", listener.id(), event);
        }

        // Dropped after the lock is released; listener captures may re-enter.
        let released = {
            let mut registry = self.registry.lock();

            let Some(entry) = registry.table.get_mut(&event) else {
                return Err(DispatchError::UnknownEvent {
                    event: format!("{:?}", event),
                });
            };

            if entry.is_empty() {
                return Err(DispatchError::EmptyChain {
                    event: format!("{:?}", event),
                });
            }

            let attempted = P::signature();
            if entry.signature() != &attempted {
                return Err(conflict(event, Operation::Unsubscribe, entry.as_ref(), attempted));
            }

            let Some(chain) = entry.as_any_mut().downcast_mut::<Chain<P>>() else {
                return Err(conflict(event, Operation::Unsubscribe, entry.as_ref(), attempted));
            };

            let removed = chain.remove(listener);
            if removed.is_none() {
                debug!("Listener {:?} was not subscribed to {:?}", listener.id(), event);
            }

            let drained = if entry.is_empty() {
                registry.table.remove(&event)
            } else {
                None
            };

            (removed, drained)
        };

        drop(released);
        Ok(())
    }

    //--- Publishing -------------------------------------------------------

    /// Invokes every listener for `event` in registration order.
    ///
    /// The payload is a tuple of zero to three arguments; each listener
    /// receives references into it. Publishing to an event with no entry
    /// succeeds and does nothing.
    ///
    /// Listeners run on a snapshot of the chain taken before the first
    /// call, so listeners may subscribe, unsubscribe or publish on this
    /// dispatcher; such changes apply from the next publish.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::SignatureConflict`] if the payload does not match
    ///   the event's signature. No listener is invoked.
    /// - [`DispatchError::ListenerFailed`] if a listener returns an error;
    ///   listeners after it are not invoked.
    pub fn publish<P: Payload>(&self, event: E, payload: P) -> Result<(), DispatchError> {
        if self.config.log_broadcasts {
            debug!("Publishing {:?} with {}", event, P::signature());
        }

        let listeners = {
            let registry = self.registry.lock();

            let Some(entry) = registry.table.get(&event) else {
                if self.config.require_listener {
                    warn!(
                        "Publishing {:?} but no listener found. Try marking the event permanent.",
                        event
                    );
                }
                return Ok(());
            };

            let attempted = P::signature();
            if entry.signature() != &attempted {
                return Err(conflict(event, Operation::Publish, entry.as_ref(), attempted));
            }

            let Some(chain) = entry.as_any().downcast_ref::<Chain<P>>() else {
                return Err(conflict(event, Operation::Publish, entry.as_ref(), attempted));
            };

            chain.snapshot()
        };

        for listener in &listeners {
            listener
                .invoke(&payload)
                .map_err(|source| DispatchError::ListenerFailed {
                    event: format!("{:?}", event),
                    source,
                })?;
        }

        Ok(())
    }

    //--- Lifecycle --------------------------------------------------------

    /// Exempts `event` from [`cleanup`](Self::cleanup).
    ///
    /// Works whether or not the event currently has listeners. Idempotent.
    pub fn mark_permanent(&self, event: E) {
        if self.config.log_lifecycle {
            debug!("Marking {:?} as permanent", event);
        }

        self.registry.lock().permanent.insert(event);
    }

    /// Returns true if `event` has been marked permanent.
    pub fn is_permanent(&self, event: E) -> bool {
        self.registry.lock().permanent.contains(&event)
    }

    /// Drops every entry whose event is not permanent.
    ///
    /// Permanent entries keep their whole chain. The permanent set itself
    /// is left untouched. Call at scope boundaries such as level loads.
    pub fn cleanup(&self) {
        let removed: Vec<(E, Box<dyn ListenerChain>)> = {
            let mut guard = self.registry.lock();
            let Registry { table, permanent } = &mut *guard;

            let doomed: Vec<E> = table
                .keys()
                .filter(|event| !permanent.contains(*event))
                .copied()
                .collect();

            doomed
                .into_iter()
                .filter_map(|event| table.remove_entry(&event))
                .collect()
        };

        if self.config.log_lifecycle {
            debug!(
                "Cleanup removed {} event(s): {:?}",
                removed.len(),
                removed.iter().map(|(event, _)| event).collect::<Vec<_>>()
            );
        }
    }

    //--- Query API --------------------------------------------------------

    /// Returns true if `event` currently has a registry entry.
    pub fn contains(&self, event: E) -> bool {
        self.registry.lock().table.contains_key(&event)
    }

    /// Number of listeners registered for `event`.
    pub fn listener_count(&self, event: E) -> usize {
        self.registry
            .lock()
            .table
            .get(&event)
            .map(|chain| chain.len())
            .unwrap_or(0)
    }

    /// Signature locked in for `event`, if it has listeners.
    pub fn signature(&self, event: E) -> Option<Signature> {
        self.registry
            .lock()
            .table
            .get(&event)
            .map(|chain| chain.signature().clone())
    }

    /// Number of events with a registry entry.
    pub fn len(&self) -> usize {
        self.registry.lock().table.len()
    }

    /// Returns true if no event has listeners.
    pub fn is_empty(&self) -> bool {
        self.registry.lock().table.is_empty()
    }

    //--- Diagnostics ------------------------------------------------------

    /// Snapshot of `(event, signature)` for every registry entry.
    ///
    /// Order is unspecified. Later registry changes do not affect an
    /// iterator already returned.
    pub fn inspect(&self) -> impl Iterator<Item = (E, Signature)> {
        let entries: Vec<(E, Signature)> = self
            .registry
            .lock()
            .table
            .iter()
            .map(|(event, chain)| (*event, chain.signature().clone()))
            .collect();

        entries.into_iter()
    }

    /// Logs the registry contents at info level.
    pub fn print_event_table(&self) {
        let registry = self.registry.lock();

        info!("=== Event table ({} events) ===", registry.table.len());
        for (event, chain) in registry.table.iter() {
            info!(
                "  {:?}  {}  listeners={}{}",
                event,
                chain.signature(),
                chain.len(),
                if registry.permanent.contains(event) { "  [permanent]" } else { "" }
            );
        }
    }
}

impl<E: EventKey> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================
