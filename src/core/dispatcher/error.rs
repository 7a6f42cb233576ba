//=========================================================================
// Dispatch Errors
//=========================================================================
//
// Failures surfaced by EventDispatcher operations. All of them point at a
// wiring mistake in the application and are returned to the caller as-is.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::signature::Signature;

//=== Operation ===========================================================

/// Dispatcher operation that detected a signature mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Subscribe,
    Unsubscribe,
    Publish,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Subscribe => "subscribe",
            Operation::Unsubscribe => "unsubscribe",
            Operation::Publish => "publish",
        })
    }
}

//=== DispatchError =======================================================

/// Errors produced by [`EventDispatcher`](super::EventDispatcher).
///
/// Event identifiers are carried in their `Debug` form so the error type
/// does not depend on the application's key type.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Payload shape disagrees with the signature already locked in for the event.
    #[error("cannot {operation} on event {event}: listeners have signature {registered} but {attempted} was supplied")]
    SignatureConflict {
        event: String,
        operation: Operation,
        registered: Signature,
        attempted: Signature,
    },

    /// Unsubscribe on an event that has no registry entry.
    #[error("cannot unsubscribe from event {event}: no listeners are registered for it")]
    UnknownEvent { event: String },

    /// Registry entry exists but holds no listeners.
    #[error("cannot unsubscribe from event {event}: its listener chain is empty")]
    EmptyChain { event: String },

    /// A listener returned an error; the rest of the chain was not invoked.
    #[error("listener for event {event} failed: {source}")]
    ListenerFailed {
        event: String,
        #[source]
        source: anyhow::Error,
    },
}

impl DispatchError {
    /// Short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::SignatureConflict { .. } => "signature_conflict",
            DispatchError::UnknownEvent { .. } => "unknown_event",
            DispatchError::EmptyChain { .. } => "empty_chain",
            DispatchError::ListenerFailed { .. } => "listener_failed",
        }
    }

    /// Debug form of the event the error refers to.
    pub fn event(&self) -> &str {
        match self {
            DispatchError::SignatureConflict { event, .. }
            | DispatchError::UnknownEvent { event }
            | DispatchError::EmptyChain { event }
            | DispatchError::ListenerFailed { event, .. } => event,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        let err = DispatchError::UnknownEvent {
            event: "Shake".into(),
        };
        assert_eq!(err.as_label(), "unknown_event");
        assert_eq!(err.event(), "Shake");
    }

    #[test]
    fn conflict_message_names_both_signatures() {
        let err = DispatchError::SignatureConflict {
            event: "ScoreChanged".into(),
            operation: Operation::Subscribe,
            registered: Signature::of::<(i32,)>(),
            attempted: Signature::of::<(bool,)>(),
        };
        let text = err.to_string();
        assert!(text.contains("subscribe"));
        assert!(text.contains("Fn(&i32)"));
        assert!(text.contains("Fn(&bool)"));
    }

    #[test]
    fn listener_failure_keeps_source() {
        let err = DispatchError::ListenerFailed {
            event: "Died".into(),
            source: anyhow::anyhow!("boom"),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.as_label(), "listener_failed");
    }
}
