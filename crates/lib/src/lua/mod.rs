//! Lua front end for the provisioning DSL.
//!
//! A configuration file is plain Lua. Statements take three equivalent forms:
//!
//! ```lua
//! Install "Git"                       -- Subject "Action"
//! Setup("Provider", "virtualbox", "dev")
//! install_git()                       -- flattened verb_noun
//! cd("~/src/app", function()          -- Dir("In", dir, fn)
//!   npm_install()
//! end)
//! ```
//!
//! # Submodules
//!
//! - [`convert`] - Lua values to handler arguments
//! - [`globals`] - Subject lookup on `_G` and the `cd` helper
//! - [`runtime`] - Lua VM setup and file loading
//! - [`state`] - Provisioning state shared with Lua callbacks

pub mod convert;
pub mod globals;
pub mod runtime;
pub mod state;
