//! Game state module: the Mölkky engine and its data model. State lives in
//! WASM memory (thread_local) for the lifetime of the Web Worker.

pub mod clock;
pub mod engine;
pub mod guard;
pub mod model;
pub mod rules;
pub mod state;
pub mod stats;
