//! Client side of the organizer.
//!
//! ARCHITECTURE
//! ============
//! `api` speaks the HTTP API. `outbox` owns the write path: note and board
//! writes are queued, applied in order by one worker, and retried with
//! linear backoff. `desk` runs a `canvas::engine::BoardSession` against both,
//! performing the actions the session emits and feeding sync results back
//! as unsynced flags.

pub mod api;
pub mod desk;
pub mod outbox;
