// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::{
	Arc,
	atomic::{AtomicBool, Ordering},
};

/// Cooperative cancellation flag of a process. Polled at operator-call
/// boundaries and loop iterations.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn abort(&self) {
		self.0.store(true, Ordering::Release);
	}

	pub fn is_aborted(&self) -> bool {
		self.0.load(Ordering::Acquire)
	}

	pub fn reset(&self) {
		self.0.store(false, Ordering::Release);
	}
}
