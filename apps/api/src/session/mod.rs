// Session lifecycle: in-memory store, profile assembly, the Created → Answered
// flow, and its HTTP handlers.

pub mod assembler;
pub mod handlers;
pub mod models;
pub mod service;
pub mod store;
