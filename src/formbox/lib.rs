//! # Formbox Architecture
//!
//! Formbox is a **UI-agnostic form-building and data-binding library**: it
//! turns plain configuration data into trees of form nodes, renders those
//! trees to markup, and maps submitted data back into per-field storage —
//! without assuming anything about the hosting application beyond a small
//! set of collaborator traits.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade bundling the factory and collaborators       │
//! │  - Dispatches to operations, returns structured Results     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Operation Layer (metabox/render.rs, metabox/save.rs)       │
//! │  - Pure binder logic: value injection, the save gate chain  │
//! │  - Generic over collaborators, no I/O assumptions           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Model Layer (node/, factory.rs, validator/, helpers/)      │
//! │  - Node variants composing capability traits                │
//! │  - Config-driven construction, flatten/reverse-flatten,     │
//! │    rule chains                                              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Collaborator Layer (storage/, security.rs, upload.rs,      │
//! │  hooks.rs)                                                  │
//! │  - Traits the host implements; bundled in-memory and        │
//! │    file-backed implementations                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: the Host Owns the Edges
//!
//! Everything from `api.rs` inward takes regular Rust values and returns
//! `Result`s. HTTP parsing, admin-screen wiring and real persistence live
//! in the hosting application; formbox only sees a [`metabox::Submission`]
//! on the way in and a [`storage::MetaStorage`] on the way out. Silent
//! no-ops (autosaves, foreign entity kinds, absent payloads) are modeled
//! as skip outcomes, never as errors.
//!
//! ## Execution Model
//!
//! Single-threaded and request-scoped. A node tree is exclusively owned by
//! the render or submit call that built it. The factory registry is
//! populated during startup and passed by reference afterwards; it is not
//! a process-wide mutable table.
//!
//! ## Testing Strategy
//!
//! 1. **Model** (`node/`, `factory.rs`, `validator/`, `helpers/`):
//!    thorough unit tests of construction, rendering and transforms —
//!    the lion's share of testing.
//! 2. **Operations** (`metabox/*.rs`): unit tests against in-memory
//!    doubles, including a call-recording store for no-op paths.
//! 3. **End-to-end** (`tests/`): stored-value round trips through render
//!    and save.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade — entry point for hosting code
//! - [`node`]: Node variants and capability traits
//! - [`factory`]: Configuration-driven node construction
//! - [`validator`]: Per-field rule chains with memoized outcomes
//! - [`metabox`]: The field binder: render and save paths
//! - [`storage`]: Meta storage trait and bundled backends
//! - [`security`]: Token and capability collaborators
//! - [`upload`]: Upload collaborator and directory-backed store
//! - [`hooks`]: Extensibility points around persistence
//! - [`helpers`]: Flatten/reverse-flatten and string utilities
//! - [`error`]: Error types

pub mod api;
pub mod error;
pub mod factory;
pub mod helpers;
pub mod hooks;
pub mod metabox;
pub mod node;
pub mod security;
pub mod storage;
pub mod upload;
pub mod validator;
