//! Whiteboard runtime: a persistent card board shared between windows.
//!
//! Each window owns a [`store::Store`] holding the canonical board, a
//! receiver on the cross-window channel, and a gesture engine from the
//! `canvas` crate. Commits are written to [`storage`] and broadcast through
//! [`sync`]; every window replaces its board with whatever it received last.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | Canonical board, the commit choke point, card operations |
//! | [`window`] | Store + receiver + gesture engine for one window |
//! | [`sync`] | `UPDATE` message codec and broadcast channels |
//! | [`storage`] | Durable named-slot backends (memory, file) |
//! | [`import`] | Image files to image cards |
//! | [`config`] | Environment-driven settings |

pub mod config;
pub mod import;
pub mod storage;
pub mod store;
pub mod sync;
pub mod window;
