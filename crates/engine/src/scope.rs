// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Guards for everything a node or a call pushes onto the process context.
//! Each guard dereferences to the [`Context`] it borrows, so guards nest, and
//! restores what it pushed when dropped, on every exit path.

use std::{
	mem,
	ops::{Deref, DerefMut},
};

use relcore_catalog::User;
use relcore_transaction::{AppGuard, ApplicationTransaction};
use relcore_type::{Error, Result};
use tracing::trace;

use crate::{
	Context,
	stack::{StackMark, Symbol},
};

macro_rules! scope_deref {
	($($scope:ident),* $(,)?) => {
		$(
			impl Deref for $scope<'_> {
				type Target = Context;

				fn deref(&self) -> &Context {
					self.ctx
				}
			}

			impl DerefMut for $scope<'_> {
				fn deref_mut(&mut self) -> &mut Context {
					self.ctx
				}
			}
		)*
	};
}

scope_deref!(FrameScope, WindowScope, SecurityScope, InsertModeScope, GlobalContextScope, ErrorScope);

/// A lexical frame. Symbols pushed inside it are popped with it.
pub(crate) struct FrameScope<'a> {
	ctx: &'a mut Context,
	mark: StackMark,
}

impl<'a> FrameScope<'a> {
	pub(crate) fn push(ctx: &'a mut Context) -> Self {
		let mark = ctx.stack.mark();
		ctx.stack.push_frame();
		Self {
			ctx,
			mark,
		}
	}
}

impl Drop for FrameScope<'_> {
	fn drop(&mut self) {
		self.ctx.stack.truncate(self.mark);
	}
}

/// The callee side of an operator call: the argument symbols, a window over
/// them and one level of call depth.
pub(crate) struct WindowScope<'a> {
	ctx: &'a mut Context,
	mark: StackMark,
}

impl<'a> WindowScope<'a> {
	pub(crate) fn open(ctx: &'a mut Context, arguments: Vec<Symbol>) -> Result<Self> {
		let mark = ctx.stack.mark();
		let size = arguments.len();
		let pushed = arguments.into_iter().try_for_each(|symbol| ctx.stack.push(symbol));
		if let Err(err) = pushed.and_then(|_| ctx.stack.push_window(size)) {
			ctx.stack.truncate(mark);
			return Err(Error::from(err));
		}
		ctx.call_depth += 1;
		Ok(Self {
			ctx,
			mark,
		})
	}
}

impl Drop for WindowScope<'_> {
	fn drop(&mut self) {
		self.ctx.call_depth -= 1;
		self.ctx.stack.truncate(self.mark);
	}
}

/// Runs with the rights of another user.
pub(crate) struct SecurityScope<'a> {
	ctx: &'a mut Context,
	previous: Option<User>,
}

impl<'a> SecurityScope<'a> {
	pub(crate) fn switch(ctx: &'a mut Context, user: User) -> Self {
		let previous = mem::replace(&mut ctx.user, user);
		Self {
			ctx,
			previous: Some(previous),
		}
	}
}

impl Drop for SecurityScope<'_> {
	fn drop(&mut self) {
		if let Some(previous) = self.previous.take() {
			self.ctx.user = previous;
		}
	}
}

pub(crate) struct InsertModeScope<'a> {
	ctx: &'a mut Context,
	previous: bool,
}

impl<'a> InsertModeScope<'a> {
	pub(crate) fn set(ctx: &'a mut Context, is_insert: bool) -> Self {
		let previous = mem::replace(&mut ctx.is_insert, is_insert);
		Self {
			ctx,
			previous,
		}
	}
}

impl Drop for InsertModeScope<'_> {
	fn drop(&mut self) {
		self.ctx.is_insert = self.previous;
	}
}

/// The global context of an application transaction. Holding it makes the
/// transaction's overlay visible and keeps other threads out of it.
pub(crate) struct GlobalContextScope<'a> {
	ctx: &'a mut Context,
	guard: Option<AppGuard<'a>>,
}

impl<'a> GlobalContextScope<'a> {
	pub(crate) fn enter(ctx: &'a mut Context, app: Option<&'a ApplicationTransaction>) -> Self {
		let guard = app.map(|app| {
			trace!(app = %app.id(), depth = ctx.global_depth + 1, "push global context");
			app.enter()
		});
		if guard.is_some() {
			ctx.global_depth += 1;
		}
		Self {
			ctx,
			guard,
		}
	}
}

impl Drop for GlobalContextScope<'_> {
	fn drop(&mut self) {
		if self.guard.take().is_some() {
			self.ctx.global_depth -= 1;
		}
	}
}

/// The error being handled by an exception handler.
pub(crate) struct ErrorScope<'a> {
	ctx: &'a mut Context,
}

impl<'a> ErrorScope<'a> {
	pub(crate) fn push(ctx: &'a mut Context, error: Error) -> Self {
		ctx.errors.push(error);
		Self {
			ctx,
		}
	}
}

impl Drop for ErrorScope<'_> {
	fn drop(&mut self) {
		self.ctx.errors.pop();
	}
}
