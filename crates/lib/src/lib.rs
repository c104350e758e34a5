//! vmprov-lib: core of the vmprov provisioning DSL
//!
//! A Lua configuration file is evaluated into a [`session::Session`], an
//! ordered list of VM directives and shell fragments:
//!
//! - `cache`: URL-keyed artifact cache shared by host and guest
//! - `registry`: `(subject, action, platform)` handler lookup
//! - `recipes`: the shipped handlers (`Setup`, `Install`, `Git`, ...)
//! - `handoff`: writing a session out for an orchestrator

pub mod cache;
pub mod config;
pub mod consts;
pub mod context;
pub mod error;
pub mod eval;
pub mod handoff;
pub mod install;
pub mod lua;
pub mod platform;
pub mod recipes;
pub mod registry;
pub mod script;
pub mod session;
pub mod util;
