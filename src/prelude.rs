//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_messenger::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Event dispatcher
pub use crate::core::dispatcher::{
    DispatchError, DispatcherBuilder, DispatcherConfig, EventDispatcher, EventKey, Listener,
    ListenerResult, Signature,
};

// Scene system
pub use crate::core::scene::{Scene, SceneContext, SceneKey, SceneManager, SceneTransition};

// Collaborators
pub use crate::core::audio::{AudioCmd, AudioTrigger, ClipKey};
pub use crate::core::globals::{GlobalConsts, GlobalVars, Globals};
pub use crate::core::pool::{ObjectPool, PoolHandle, PoolKind};
