//! Board canvas core for the organizer.
//!
//! This crate owns everything that happens on a board between a pointer event
//! and a persistence request: the pannable/zoomable viewport, the in-memory
//! note collection, the pan/drag/resize gesture state machine, and the board
//! session that ties them together. It performs no I/O. Every operation
//! returns [`engine::Action`]s and the host (see the `cli` crate's `Desk`)
//! is responsible for fetching and persisting.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::BoardSession`]: board activation, optimistic updates, actions |
//! | [`doc`] | Note records, sparse patches, and the ordered in-memory store |
//! | [`camera`] | Viewport pan/zoom and screen/world conversions |
//! | [`input`] | The gesture state machine (pan, note drag, note resize) |
//! | [`hit`] | Pointer-down target resolution |
//! | [`consts`] | Shared numeric constants (zoom limits, minimum sizes, z-index sentinels) |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod input;
