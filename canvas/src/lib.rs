//! Card model and gesture engine for the whiteboard.
//!
//! This crate holds everything a window needs to show and manipulate cards
//! without knowing how boards are stored or shared: the serialized card and
//! board types, rendered geometry, hit-testing, and the drag/resize state
//! machine. Input handlers return [`engine::Action`]s; the host applies the
//! visual ones and forwards each `Commit` to its store.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`doc`] | Card, patch, theme and board types with their JSON shape |
//! | [`engine`] | Per-card gesture controllers and the [`engine::Canvas`] router |
//! | [`input`] | Pointer samples and the gesture state enum |
//! | [`hit`] | Resize handle and control regions of a card |
//! | [`layout`] | Rendered size of auto-sized cards |
//! | [`geom`] | Points, sizes and rectangles |
//! | [`consts`] | Thresholds, minimum sizes and default widths |
//! | `web` | DOM event adapters (feature `web`) |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod layout;
#[cfg(feature = "web")]
pub mod web;
