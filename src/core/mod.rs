//=========================================================================
// Core Systems
//
// Engine-side systems that communicate through the event dispatcher.
//
// Responsibilities:
// - `dispatcher`: typed publish/subscribe registry with permanent events
// - `scene`: scene stack whose level loads mark dispatcher cleanup points
// - `globals`: INI-backed constants and runtime variables
// - `pool`: reusable object caches that grow on exhaustion
// - `audio`: fire-and-forget playback requests to the audio thread
//
// Notes:
// Only the dispatcher keeps invariants across calls. The other systems
// are its consumers or triggers and hold no shared state with it.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod audio;
pub mod dispatcher;
pub mod globals;
pub mod pool;
pub mod scene;
