//=========================================================================
// Global Constants & Variables
//=========================================================================
//
// Plain configuration containers shared by scenes and systems.
//
// Architecture:
//   Globals
//     ├─ consts: Arc<GlobalConsts>   (INI-backed, swappable profile)
//     └─ vars:   GlobalVars          (runtime values)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;
use std::sync::Arc;

use log::debug;
use thiserror::Error;

//=== Module Declarations =================================================

mod global_consts;
mod global_vars;

//=== Public API ==========================================================

pub use global_consts::{GlobalConsts, DISPATCHER_SECTION};
pub use global_vars::{GlobalVars, VarValue};

//=== GlobalsError ========================================================

/// Errors raised while loading or reading constants.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum GlobalsError {
    /// The constants file could not be read or parsed.
    #[error("failed to load constants from {}: {message}", .path.display())]
    Load { path: PathBuf, message: String },

    /// INI text could not be parsed.
    #[error("failed to parse constants: {message}")]
    Parse { message: String },

    /// A value exists but does not parse as the requested type.
    #[error("invalid value {value:?} for [{section}] {key}")]
    Invalid {
        section: String,
        key: String,
        value: String,
    },
}

//=== Globals =============================================================

/// Active constant profile plus runtime variables.
///
/// The constant profile can be swapped wholesale (e.g. "easy" vs "hard"
/// tuning) without touching the variables.
#[derive(Debug, Clone, Default)]
pub struct Globals {
    consts: Arc<GlobalConsts>,

    /// Runtime variables.
    pub vars: GlobalVars,
}

impl Globals {
    /// Creates a holder around an initial constant profile.
    pub fn new(consts: GlobalConsts) -> Self {
        Self {
            consts: Arc::new(consts),
            vars: GlobalVars::new(),
        }
    }

    /// Currently active constants.
    pub fn consts(&self) -> &Arc<GlobalConsts> {
        &self.consts
    }

    /// Replaces the active constant profile.
    pub fn set_active_consts(&mut self, consts: Arc<GlobalConsts>) {
        debug!("Switching active constant profile");
        self.consts = consts;
    }
}

//=========================================================================
// Tests
//=========================================================================
