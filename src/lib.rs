//=========================================================================
// Aetheric Messenger: Library Root
//
// In-process event dispatcher for the Aetheric engine.
//
// Responsibilities:
// - Let systems communicate by named event instead of direct reference
// - Enforce a single payload signature per event across all publishers
//   and subscribers
// - Drop scene-local subscriptions at level boundaries while keeping
//   events marked permanent
//
// Typical usage:
// ```
// use aetheric_messenger::prelude::*;
//
// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
// enum GameEvent { ScoreChanged }
// impl EventKey for GameEvent {}
//
// let dispatcher = EventDispatcher::new();
// let on_score = Listener::unary(|score: &i32| {
//     println!("score: {score}");
//     Ok(())
// });
// dispatcher.subscribe(GameEvent::ScoreChanged, &on_score).unwrap();
// dispatcher.publish(GameEvent::ScoreChanged, (42,)).unwrap();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the dispatcher and the systems built around it.
//
pub mod core;

pub mod prelude;

//--- Public Exports ------------------------------------------------------
//
// The dispatcher is the main entry point; re-exported at the crate root
// so applications can `use aetheric_messenger::EventDispatcher;`.
//
pub use crate::core::dispatcher::{DispatchError, EventDispatcher, EventKey, Listener};
