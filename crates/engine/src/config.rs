// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

use serde::Deserialize;

/// Limits and defaults applied to every process of a database.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
	/// Maximum number of stack slots per process.
	pub max_stack_depth: usize,
	/// Maximum number of nested operator calls.
	pub max_call_depth: usize,
	/// Treat a nil condition as false. When unset a nil condition is an error.
	pub propagate_nil: bool,
	/// Default for the row-level update/delete API when the caller does not
	/// ask for an optimistic concurrency check explicitly.
	pub check_concurrency: bool,
	/// Bound used by `Process::execute_with_timeout` when none is given.
	#[serde(with = "millis")]
	pub default_timeout: Option<Duration>,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			max_stack_depth: 4096,
			max_call_depth: 256,
			propagate_nil: true,
			check_concurrency: false,
			default_timeout: None,
		}
	}
}

impl EngineConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn max_stack_depth(mut self, depth: usize) -> Self {
		self.max_stack_depth = depth;
		self
	}

	pub fn max_call_depth(mut self, depth: usize) -> Self {
		self.max_call_depth = depth;
		self
	}

	pub fn propagate_nil(mut self, propagate: bool) -> Self {
		self.propagate_nil = propagate;
		self
	}

	pub fn check_concurrency(mut self, check: bool) -> Self {
		self.check_concurrency = check;
		self
	}

	pub fn default_timeout(mut self, timeout: Duration) -> Self {
		self.default_timeout = Some(timeout);
		self
	}
}

mod millis {
	use std::time::Duration;

	use serde::{Deserialize, Deserializer};

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
	where
		D: Deserializer<'de>,
	{
		Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
	}
}
