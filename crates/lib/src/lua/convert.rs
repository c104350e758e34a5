//! Conversion of Lua call arguments into handler [`Arg`]s.

use std::collections::{BTreeMap, HashSet};
use std::ffi::c_void;
use std::rc::Rc;

use mlua::prelude::*;

use super::state::DslState;
use crate::registry::{Arg, Block};

/// Convert a single Lua value.
///
/// Tables with a non-empty sequence part become arrays; other tables become
/// string-keyed maps. A table that contains itself is rejected.
pub fn lua_value_to_arg(value: LuaValue) -> LuaResult<Arg> {
  convert_value(value, &mut HashSet::new())
}

fn convert_value(value: LuaValue, open: &mut HashSet<*const c_void>) -> LuaResult<Arg> {
  match value {
    LuaValue::String(s) => Ok(Arg::String(s.to_str()?.to_string())),
    LuaValue::Integer(i) => Ok(Arg::Integer(i)),
    LuaValue::Number(n) => Ok(Arg::Number(n)),
    LuaValue::Boolean(b) => Ok(Arg::Boolean(b)),
    LuaValue::Table(t) => {
      let ptr = t.to_pointer();
      if !open.insert(ptr) {
        return Err(LuaError::external("cyclic table passed as an argument"));
      }
      let arg = convert_table(&t, open)?;
      open.remove(&ptr);
      Ok(arg)
    }
    LuaValue::Nil => Err(LuaError::external("nil is only allowed as a trailing argument")),
    other => Err(LuaError::external(format!(
      "unsupported argument type: {}",
      other.type_name()
    ))),
  }
}

fn convert_table(t: &LuaTable, open: &mut HashSet<*const c_void>) -> LuaResult<Arg> {
  let len = t.raw_len();
  let first: LuaValue = t.raw_get(1)?;
  if len > 0 && !first.is_nil() {
    let mut items = Vec::with_capacity(len);
    for i in 1..=len {
      items.push(convert_value(t.raw_get(i)?, open)?);
    }
    return Ok(Arg::Array(items));
  }

  let mut map = BTreeMap::new();
  for pair in t.pairs::<LuaValue, LuaValue>() {
    let (key, value) = pair?;
    let LuaValue::String(key) = key else {
      return Err(LuaError::external(format!(
        "table keys must be strings, got {}",
        key.type_name()
      )));
    };
    map.insert(key.to_str()?.to_string(), convert_value(value, open)?);
  }
  Ok(Arg::Table(map))
}

/// Split statement arguments into values and an optional trailing block.
///
/// Trailing `nil`s are dropped. A function is only accepted in last position.
pub fn statement_arguments(
  mut values: Vec<LuaValue>,
  state: &Rc<DslState>,
) -> LuaResult<(Vec<Arg>, Option<Block>)> {
  while values.last().is_some_and(LuaValue::is_nil) {
    values.pop();
  }

  let block = match values.last() {
    Some(LuaValue::Function(_)) => match values.pop() {
      Some(LuaValue::Function(func)) => Some(state.block(func)),
      _ => None,
    },
    _ => None,
  };

  let args = values
    .into_iter()
    .map(|value| match value {
      LuaValue::Function(_) => Err(LuaError::external("a block must be the last argument")),
      value => lua_value_to_arg(value),
    })
    .collect::<LuaResult<Vec<_>>>()?;

  Ok((args, block))
}
