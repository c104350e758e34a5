use std::path::Path;
use std::rc::Rc;

use mlua::prelude::*;

use super::globals;
use super::state::DslState;

/// Create a Lua runtime with the DSL globals bound to `state`.
pub fn create_runtime(state: Rc<DslState>) -> LuaResult<Lua> {
  let lua = Lua::new();
  globals::register_globals(&lua, state)?;
  Ok(lua)
}

/// Execute the Lua file at `path`.
pub fn load_file(lua: &Lua, path: &Path) -> LuaResult<()> {
  let content = std::fs::read_to_string(path)
    .map_err(|e| LuaError::external(format!("cannot read '{}': {}", path.display(), e)))?;
  load_chunk(lua, &content, &format!("@{}", path.display()))
}

/// Execute a chunk of Lua source under `name`.
pub fn load_chunk(lua: &Lua, source: &str, name: &str) -> LuaResult<()> {
  lua.load(source).set_name(name).exec()
}
