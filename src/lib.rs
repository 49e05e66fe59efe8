//! Test Centre chat widget
//!
//! A pure state machine for the floating chat widget, a runtime that talks
//! to the Reply Service over HTTP, a terminal front end, and the Reply Service
//! itself with its echo and FAQ backends.

pub mod api;
pub mod client;
pub mod config;
pub mod reply;
pub mod runtime;
pub mod tui;
pub mod widget;
