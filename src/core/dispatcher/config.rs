//=========================================================================
// Dispatcher Configuration
//=========================================================================
//
// Runtime logging switches for the dispatcher and the builder that
// applies them.
//
//   DispatcherBuilder ──build()──> EventDispatcher<E>
//       ├─ with_lifecycle_logging()
//       ├─ with_subscription_logging()
//       ├─ with_broadcast_logging()
//       └─ with_require_listener()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::marker::PhantomData;

use log::info;

//=== Internal Dependencies ===============================================

use super::{EventDispatcher, EventKey};

//=== DispatcherConfig ====================================================

/// Logging and diagnostics switches. All off by default.
///
/// Constants files can carry these under a `[dispatcher]` section; see
/// `GlobalConsts::dispatcher_config`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Log mark-permanent, cleanup and unsubscribe.
    pub log_lifecycle: bool,
    /// Log every subscribe.
    pub log_subscriptions: bool,
    /// Log every publish.
    pub log_broadcasts: bool,
    /// Warn when publishing to an event nobody listens to.
    pub require_listener: bool,
}

//=== DispatcherBuilder ===================================================

/// Builder for an [`EventDispatcher`].
///
/// # Examples
///
/// ```
/// use aetheric_messenger::core::dispatcher::{DispatcherBuilder, EventKey};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum GameEvent { ScreenShake }
/// impl EventKey for GameEvent {}
///
/// let dispatcher = DispatcherBuilder::<GameEvent>::new()
///     .with_broadcast_logging(true)
///     .with_require_listener(true)
///     .build();
/// assert!(dispatcher.config().require_listener);
/// ```
pub struct DispatcherBuilder<E: EventKey> {
    config: DispatcherConfig,
    _phantom: PhantomData<E>,
}

impl<E: EventKey> DispatcherBuilder<E> {
    /// Creates a builder with every switch off.
    pub fn new() -> Self {
        Self {
            config: DispatcherConfig::default(),
            _phantom: PhantomData,
        }
    }

    /// Starts from an existing configuration.
    pub fn with_config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Logs mark-permanent, cleanup and unsubscribe.
    pub fn with_lifecycle_logging(mut self, enabled: bool) -> Self {
        self.config.log_lifecycle = enabled;
        self
    }

    /// Logs every subscribe.
    pub fn with_subscription_logging(mut self, enabled: bool) -> Self {
        self.config.log_subscriptions = enabled;
        self
    }

    /// Logs every publish.
    pub fn with_broadcast_logging(mut self, enabled: bool) -> Self {
        self.config.log_broadcasts = enabled;
        self
    }

    /// Warns when an event is published with no listener registered.
    ///
    /// Handy for spotting events that lost their listeners at a scene
    /// boundary because they were never marked permanent.
    pub fn with_require_listener(mut self, enabled: bool) -> Self {
        self.config.require_listener = enabled;
        self
    }

    /// Builds an empty dispatcher.
    pub fn build(self) -> EventDispatcher<E> {
        info!("Building event dispatcher ({:?})", self.config);
        EventDispatcher::with_config(self.config)
    }
}

impl<E: EventKey> Default for DispatcherBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================
