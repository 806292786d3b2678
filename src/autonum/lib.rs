//! # Autonum Architecture
//!
//! Autonum keeps a designated attribute tag uniquely, monotonically numbered
//! across every way an object can enter a drawing — insert, copy, paste,
//! deserialize — by intercepting the host's commit notifications instead of
//! patching any creation path.
//!
//! The engine is a **UI-agnostic library**; the bundled CLI is just one
//! client that drives it over JSON drawing snapshots.
//!
//! ## The Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (args.rs, wired by main.rs)                      │
//! │  - Parses arguments, prints results, owns exit codes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - scan / apply business logic over a DrawingFile           │
//! │  - Returns structured CmdResult, never prints               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engine (controller.rs, scan.rs, seq.rs, session.rs)        │
//! │  - Seed scan → counter → commit interception                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Host Contracts (host/)                                     │
//! │  - ObjectModel, NotificationStream, TrackedObject traits    │
//! │  - MemoryDrawing (in-memory), DrawingFile (JSON)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## How Numbering Works
//!
//! 1. A [`controller::NumberingController`] is built for one
//!    `(container, tag)` target. Construction scans every reference to the
//!    container — direct and instanced — for the largest value already
//!    assigned under the tag, and seeds the counter one past it.
//! 2. Enabling the controller subscribes one handler to the host's commit
//!    stream. For each committed object that is in the same document, newly
//!    created, writable, of the attribute class, and carries the target tag,
//!    the handler takes the next value and writes it into the object's text.
//!    Everything else passes through untouched.
//! 3. Disabling (or dropping) the controller releases the subscription; the
//!    terminal state is always disabled.
//!
//! Uniqueness comes from the strictly increasing counter and the host's
//! one-at-a-time commit order, never from comparing object identities.
//!
//! ## Module Overview
//!
//! - [`controller`]: enable/disable state machine and the commit handler
//! - [`scan`]: the read-only seed pass
//! - [`seq`]: the counter and its shared handle
//! - [`session`]: explicit ownership of the one live controller
//! - [`host`]: collaborator trait seams plus the in-memory and JSON hosts
//! - [`commands`]: business logic behind the CLI verbs
//! - [`model`]: ids, attributes, `TargetSpec`, the interception states
//! - [`error`]: error types

pub mod commands;
pub mod controller;
pub mod error;
pub mod host;
pub mod model;
pub mod scan;
pub mod seq;
pub mod session;
