//! Provisioning state shared between the Lua VM and the dispatcher.

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use mlua::prelude::*;

use crate::context::ProvisionContext;
use crate::error::ProvisionError;
use crate::registry::{Block, Command, Registry};

/// The context being built, the registry that resolves statements, and the
/// first failure seen.
///
/// The context is moved out of its cell for the duration of a dispatch, so a
/// handler that re-enters Lua (through a block) never observes a live borrow.
pub struct DslState {
  ctx: RefCell<ProvisionContext>,
  registry: Registry,
  failure: RefCell<Option<ProvisionError>>,
}

impl DslState {
  pub fn new(ctx: ProvisionContext, registry: Registry) -> Self {
    Self {
      ctx: RefCell::new(ctx),
      registry,
      failure: RefCell::new(None),
    }
  }

  pub fn registry(&self) -> &Registry {
    &self.registry
  }

  /// Run `command` against the shared context.
  ///
  /// A failed statement fails the whole evaluation, even if the script catches
  /// the Lua error with `pcall`.
  pub fn dispatch(&self, command: Command) -> LuaResult<()> {
    let mut ctx = self.ctx.take();
    let result = self.registry.dispatch(&mut ctx, command);
    self.ctx.replace(ctx);

    result.map_err(|err| {
      let message = err.to_string();
      let mut failure = self.failure.borrow_mut();
      if failure.is_none() {
        *failure = Some(err);
      }
      LuaError::external(message)
    })
  }

  /// Wrap a Lua function as a handler block.
  pub fn block(self: &Rc<Self>, func: LuaFunction) -> Block {
    let state = Rc::clone(self);
    Box::new(move |ctx: &mut ProvisionContext| {
      state.ctx.replace(mem::take(ctx));
      let result = func.call::<()>(());
      *ctx = state.ctx.take();
      result.map_err(|err| ProvisionError::Block(err.to_string()))
    })
  }

  /// The built context and the first failed statement, if any.
  pub fn into_parts(self) -> (ProvisionContext, Option<ProvisionError>) {
    (self.ctx.into_inner(), self.failure.into_inner())
  }
}
