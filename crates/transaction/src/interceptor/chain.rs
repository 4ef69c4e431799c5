// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relcore_type::Result;

/// Ordered interceptors of one kind. Cloning shares the interceptors, so a
/// chain can be snapshotted out of a lock before it runs.
pub struct InterceptorChain<I: ?Sized> {
	pub(crate) interceptors: Vec<Arc<I>>,
}

impl<I: ?Sized> InterceptorChain<I> {
	pub fn new() -> Self {
		Self {
			interceptors: Vec::new(),
		}
	}

	pub fn add(&mut self, interceptor: Arc<I>) {
		self.interceptors.push(interceptor);
	}

	pub fn is_empty(&self) -> bool {
		self.interceptors.is_empty()
	}

	pub fn len(&self) -> usize {
		self.interceptors.len()
	}

	/// Runs every interceptor in registration order, stopping at the first
	/// error.
	pub(crate) fn run<C>(&self, ctx: &mut C, intercept: impl Fn(&I, &mut C) -> Result<()>) -> Result<()> {
		for interceptor in &self.interceptors {
			intercept(interceptor.as_ref(), ctx)?;
		}
		Ok(())
	}
}

impl<I: ?Sized> Default for InterceptorChain<I> {
	fn default() -> Self {
		Self::new()
	}
}

impl<I: ?Sized> Clone for InterceptorChain<I> {
	fn clone(&self) -> Self {
		Self {
			interceptors: self.interceptors.clone(),
		}
	}
}
