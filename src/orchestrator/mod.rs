//! Application-level orchestration.
//!
//! This module turns UI commands into session controller calls, runs each one as its
//! own task, and performs the authorization hand-off. UI/CLI layers call into this
//! module to keep responsibilities separated.

mod controller;
mod handoff;

pub(crate) use controller::{run_controller, UiCommand};
pub(crate) use handoff::hand_off;
