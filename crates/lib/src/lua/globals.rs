//! DSL globals.
//!
//! Subjects are not Lua globals. A metatable on `_G` answers lookups of
//! undefined names instead:
//!
//! - a capitalized name becomes a dispatcher for that subject, so an
//!   unregistered subject is reported when it is called
//! - a lowercase `verb_noun` name that matches a registered subject becomes
//!   a dispatcher for the resolved `(Subject, Action)` pair
//!
//! Everything else stays `nil`. `cd(dir, fn)` is a plain global.
//!
//! Every undefined capitalized name is therefore a function, so it cannot
//! serve as a config flag: `if MyFlag then` is always taken. Use lowercase
//! names for config-level variables. Calling such a name reports
//! `UnknownSubject` unless it is registered.

use std::rc::Rc;

use mlua::prelude::*;
use tracing::trace;

use super::convert::statement_arguments;
use super::state::DslState;
use crate::registry::Command;

/// Install the `_G` metatable and the `cd` helper.
pub fn register_globals(lua: &Lua, state: Rc<DslState>) -> LuaResult<()> {
  let globals = lua.globals();

  let cd_state = Rc::clone(&state);
  let cd = lua.create_function(move |_, (dir, func): (String, LuaFunction)| {
    let command = Command::new("Dir", "In")
      .arg(dir.as_str())
      .with_block(cd_state.block(func));
    cd_state.dispatch(command)
  })?;
  globals.set("cd", cd)?;

  let index = lua.create_function(move |lua, (_, key): (LuaTable, LuaValue)| {
    let LuaValue::String(key) = key else {
      return Ok(LuaValue::Nil);
    };
    let name = key.to_str()?.to_string();

    if name.starts_with(|c: char| c.is_ascii_uppercase()) {
      return subject_function(lua, &state, name).map(LuaValue::Function);
    }

    match state.registry().resolve_sugar(&name) {
      Some((subject, action)) => {
        trace!(name = %name, subject = %subject, action = %action, "resolved flattened statement");
        action_function(lua, &state, subject, action).map(LuaValue::Function)
      }
      None => Ok(LuaValue::Nil),
    }
  })?;

  let mt = lua.create_table()?;
  mt.set("__index", index)?;
  globals.set_metatable(Some(mt))?;

  Ok(())
}

/// `Subject("Action", ...)`: the first argument names the action.
fn subject_function(lua: &Lua, state: &Rc<DslState>, subject: String) -> LuaResult<LuaFunction> {
  let state = Rc::clone(state);
  lua.create_function(move |_, args: LuaMultiValue| {
    let mut values: Vec<LuaValue> = args.into_iter().collect();
    let action = if values.is_empty() {
      None
    } else {
      match values.remove(0) {
        LuaValue::Nil => None,
        LuaValue::String(s) => Some(s.to_str()?.to_string()),
        other => {
          return Err(LuaError::external(format!(
            "{subject}: action name must be a string, got {}",
            other.type_name()
          )));
        }
      }
    };

    let (args, block) = statement_arguments(values, &state)?;
    let mut command = match action {
      Some(action) => Command::new(subject.as_str(), action),
      None => Command::without_action(subject.as_str()),
    }
    .with_args(args);
    if let Some(block) = block {
      command = command.with_block(block);
    }
    state.dispatch(command)
  })
}

/// `verb_noun(...)`: every argument goes to the handler.
fn action_function(lua: &Lua, state: &Rc<DslState>, subject: String, action: String) -> LuaResult<LuaFunction> {
  let state = Rc::clone(state);
  lua.create_function(move |_, args: LuaMultiValue| {
    let (args, block) = statement_arguments(args.into_iter().collect(), &state)?;
    let mut command = Command::new(subject.as_str(), action.as_str()).with_args(args);
    if let Some(block) = block {
      command = command.with_block(block);
    }
    state.dispatch(command)
  })
}
