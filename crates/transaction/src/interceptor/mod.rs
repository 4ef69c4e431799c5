// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod chain;
pub mod table;

use chain::InterceptorChain;
use table::*;

/// Interceptor chains of a database.
#[derive(Default, Clone)]
pub struct Interceptors {
	pub table_propose_insert: InterceptorChain<dyn TableProposeInsertInterceptor + Send + Sync>,
	pub table_pre_insert: InterceptorChain<dyn TablePreInsertInterceptor + Send + Sync>,
	pub table_post_insert: InterceptorChain<dyn TablePostInsertInterceptor + Send + Sync>,
	pub table_propose_update: InterceptorChain<dyn TableProposeUpdateInterceptor + Send + Sync>,
	pub table_pre_update: InterceptorChain<dyn TablePreUpdateInterceptor + Send + Sync>,
	pub table_post_update: InterceptorChain<dyn TablePostUpdateInterceptor + Send + Sync>,
	pub table_pre_delete: InterceptorChain<dyn TablePreDeleteInterceptor + Send + Sync>,
	pub table_post_delete: InterceptorChain<dyn TablePostDeleteInterceptor + Send + Sync>,
}

impl Interceptors {
	pub fn new() -> Self {
		Self::default()
	}
}
