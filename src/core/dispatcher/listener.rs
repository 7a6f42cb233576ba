//=========================================================================
// Listeners
//=========================================================================
//
// Typed callback handles stored in dispatcher chains.
//
// A Listener<P> wraps a shared callback over payload tuple P. Clones share
// the same ListenerId, which is what unsubscribe matches on.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

//=== Internal Dependencies ===============================================

use super::signature::{Payload, Signature};

//=== Public API ==========================================================

/// Result returned by every listener callback.
///
/// An `Err` aborts the remaining chain for the current publish and is
/// surfaced to the publisher as [`DispatchError::ListenerFailed`].
///
/// [`DispatchError::ListenerFailed`]: super::DispatchError::ListenerFailed
pub type ListenerResult = anyhow::Result<()>;

/// Identity of a listener; shared by all clones of the same handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

type Handler<P> = dyn Fn(&P) -> ListenerResult + Send + Sync;

//=========================================================================

/// Callback handle for payload tuple `P`.
///
/// Keep a clone around to unsubscribe later; removal is by identity, so a
/// freshly constructed listener with the same closure body will not match.
///
/// ```
/// use aetheric_messenger::core::dispatcher::Listener;
///
/// let on_score = Listener::unary(|score: &u32| {
///     println!("score is now {score}");
///     Ok(())
/// });
/// let same = on_score.clone();
/// assert_eq!(on_score.id(), same.id());
/// ```
pub struct Listener<P: Payload> {
    id: ListenerId,
    handler: Arc<Handler<P>>,
}

impl<P: Payload> Listener<P> {
    /// Wraps a callback that receives the whole payload tuple.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&P) -> ListenerResult + Send + Sync + 'static,
    {
        Self {
            id: ListenerId::next(),
            handler: Arc::new(handler),
        }
    }

    /// Identity used for unsubscribe matching.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Signature this listener expects.
    pub fn signature(&self) -> Signature {
        P::signature()
    }

    pub(super) fn invoke(&self, payload: &P) -> ListenerResult {
        (self.handler)(payload)
    }
}

//--- Arity Constructors --------------------------------------------------

impl Listener<()> {
    /// Listener for events without payload.
    pub fn nullary<F>(handler: F) -> Self
    where
        F: Fn() -> ListenerResult + Send + Sync + 'static,
    {
        Self::new(move |_: &()| handler())
    }
}

impl<A: 'static> Listener<(A,)> {
    /// Listener for single-argument events.
    pub fn unary<F>(handler: F) -> Self
    where
        F: Fn(&A) -> ListenerResult + Send + Sync + 'static,
    {
        Self::new(move |(a,): &(A,)| handler(a))
    }
}

impl<A: 'static, B: 'static> Listener<(A, B)> {
    /// Listener for two-argument events.
    pub fn binary<F>(handler: F) -> Self
    where
        F: Fn(&A, &B) -> ListenerResult + Send + Sync + 'static,
    {
        Self::new(move |(a, b): &(A, B)| handler(a, b))
    }
}

impl<A: 'static, B: 'static, C: 'static> Listener<(A, B, C)> {
    /// Listener for three-argument events.
    pub fn ternary<F>(handler: F) -> Self
    where
        F: Fn(&A, &B, &C) -> ListenerResult + Send + Sync + 'static,
    {
        Self::new(move |(a, b, c): &(A, B, C)| handler(a, b, c))
    }
}

//--- Trait Impls ---------------------------------------------------------

impl<P: Payload> Clone for Listener<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<P: Payload> PartialEq for Listener<P> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<P: Payload> Eq for Listener<P> {}

impl<P: Payload> fmt::Debug for Listener<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("signature", &P::signature().to_string())
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn clones_share_identity() {
        let a = Listener::nullary(|| Ok(()));
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn distinct_listeners_differ() {
        let a = Listener::nullary(|| Ok(()));
        let b = Listener::nullary(|| Ok(()));
        assert_ne!(a, b);
    }

    #[test]
    fn arity_constructors_unpack_payload() {
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let listener = Listener::ternary(move |a: &i32, b: &String, c: &bool| {
            sink.lock().unwrap().push(format!("{a}-{b}-{c}"));
            Ok(())
        });

        listener.invoke(&(7, "seven".to_string(), true)).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["7-seven-true".to_string()]);
    }

    #[test]
    fn signature_matches_payload() {
        let listener = Listener::binary(|_: &u8, _: &f64| Ok(()));
        assert_eq!(listener.signature(), Signature::of::<(u8, f64)>());
    }
}
