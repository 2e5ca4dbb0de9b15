//! # Core Application Logic
//!
//! The chat client itself. It knows nothing about any specific UI technology
//! or HTTP library; both arrive through traits.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • ChatClient (state)   │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │  ChatView  │      │ChatBackend │      │ KeyValue   │
//!     │ (TUI or    │      │ (reqwest)  │      │ Store      │
//!     │ Transcript)│      │            │      │ (file)     │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `ChatClient`, the rendering and send bookkeeping
//! - [`action`]: `Action` / `Effect` and the `update()` reducer
//! - [`dispatch`]: runs effects against a backend
//! - [`session`]: the persisted conversation id
//! - [`storage`]: durable key-value storage
//! - [`view`]: the `ChatView` seam and the in-memory `Transcript`
//! - [`config`]: settings file, env and CLI resolution

pub mod action;
pub mod config;
pub mod dispatch;
pub mod session;
pub mod state;
pub mod storage;
pub mod view;
