//! Event dispatch pipeline
//!
//! Turns raw device events into the normalized joystick state and decides when
//! that state goes out:
//!
//! ```text
//! RawEvent ──► dispatcher ──► JoyState ──► scheduler ──► JoyMessage sink
//!              (normalize,    (8 axes,     (tick-driven,
//!               coalesce)      11 buttons)  autorepeat)
//! ```
//!
//! The dispatcher and normalizer are pure over explicit state so they can be
//! tested without a device or a broker; the scheduler owns the mutable state
//! in a single task, so no locking is involved.

pub mod dispatcher;
pub mod normalize;
pub mod scheduler;
pub mod state;
