//=========================================================================
// Audio Trigger
//=========================================================================
//
// Fire-and-forget playback requests sent to an audio thread owned by the
// host application.
//
//   gameplay ── play(clip) ──> [bounded channel] ──> audio thread
//   dispatcher ── bind(event, clip) ──┘
//
// The trigger never blocks: a full or closed channel is reported to the
// caller and otherwise ignored.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::warn;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::dispatcher::{DispatchError, EventDispatcher, EventKey, Listener, Payload};

//=== Public API ==========================================================

/// Marker trait for audio clip identifiers.
pub trait ClipKey: Clone + Copy + Eq + Debug + Send + Sync + 'static {}

/// Commands sent to the audio thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCmd<C: ClipKey> {
    Play(C),
    Stop(C),
    StopAll,
    Shutdown,
}

/// Errors produced when a command cannot be queued.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AudioError {
    /// The audio queue is full; the command was dropped.
    #[error("audio queue is full")]
    QueueFull,

    /// The audio thread hung up.
    #[error("audio thread disconnected")]
    Disconnected,
}

//=== AudioTrigger ========================================================

/// Sending half of the audio command queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AudioTrigger<C: ClipKey> {
    tx: Sender<AudioCmd<C>>,
}

impl<C: ClipKey> AudioTrigger<C> {
    /// Creates a trigger and the receiver the audio thread should drain.
    ///
    /// A `capacity` of zero gives a rendezvous queue: a command is only
    /// accepted while the audio thread is blocked waiting for one, and is
    /// reported as [`AudioError::QueueFull`] otherwise.
    pub fn channel(capacity: usize) -> (Self, Receiver<AudioCmd<C>>) {
        let (tx, rx) = bounded(capacity);
        (Self { tx }, rx)
    }

    /// Requests playback of `clip`.
    pub fn play(&self, clip: C) -> Result<(), AudioError> {
        self.send(AudioCmd::Play(clip))
    }

    /// Requests `clip` to stop.
    pub fn stop(&self, clip: C) -> Result<(), AudioError> {
        self.send(AudioCmd::Stop(clip))
    }

    /// Requests every clip to stop.
    pub fn stop_all(&self) -> Result<(), AudioError> {
        self.send(AudioCmd::StopAll)
    }

    /// Asks the audio thread to exit.
    pub fn shutdown(&self) -> Result<(), AudioError> {
        self.send(AudioCmd::Shutdown)
    }

    fn send(&self, cmd: AudioCmd<C>) -> Result<(), AudioError> {
        self.tx.try_send(cmd).map_err(|err| match err {
            TrySendError::Full(_) => AudioError::QueueFull,
            TrySendError::Disconnected(_) => AudioError::Disconnected,
        })
    }

    //--- Dispatcher Binding -----------------------------------------------

    /// Plays `clip` every time `event` is published.
    ///
    /// The payload is ignored, so any signature works; it must still match
    /// whatever other listeners of `event` expect. Queueing failures are
    /// logged, never propagated to the publisher.
    ///
    /// Returns the listener so the binding can be undone with
    /// [`EventDispatcher::unsubscribe`].
    pub fn bind<E: EventKey, P: Payload>(
        &self,
        dispatcher: &EventDispatcher<E>,
        event: E,
        clip: C,
    ) -> Result<Listener<P>, DispatchError> {
        let trigger = self.clone();
        let listener = Listener::new(move |_: &P| {
            if let Err(err) = trigger.play(clip) {
                warn!("Dropped {:?} for {:?}: {}", clip, event, err);
            }
            Ok(())
        });

        dispatcher.subscribe(event, &listener)?;
        Ok(listener)
    }
}

//=========================================================================
// Tests
//=========================================================================
