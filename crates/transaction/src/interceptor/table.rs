// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Hooks around the physical phase of table mutations. Propose interceptors
//! may still alter the proposed row; pre and post interceptors observe it
//! and may only fail the mutation.

use relcore_plan::TableVar;
use relcore_type::{Result, Row};

use crate::interceptor::chain::InterceptorChain;

macro_rules! table_interceptor {
	(
		$(#[$doc:meta])*
		$ctx:ident<$lt:lifetime> { $($field:ident: $ty:ty),* $(,)? },
		$interceptor:ident, $closure:ident, $ctor:ident
	) => {
		$(#[$doc])*
		pub struct $ctx<$lt> {
			pub table: &$lt TableVar,
			$(pub $field: $ty,)*
		}

		impl<$lt> $ctx<$lt> {
			pub fn new(table: &$lt TableVar, $($field: $ty),*) -> Self {
				Self {
					table,
					$($field,)*
				}
			}
		}

		pub trait $interceptor: Send + Sync {
			fn intercept<$lt>(&self, ctx: &mut $ctx<$lt>) -> Result<()>;
		}

		impl InterceptorChain<dyn $interceptor + Send + Sync> {
			pub fn execute(&self, mut ctx: $ctx) -> Result<()> {
				self.run(&mut ctx, |interceptor, ctx| interceptor.intercept(ctx))
			}
		}

		pub struct $closure<F>
		where
			F: for<$lt> Fn(&mut $ctx<$lt>) -> Result<()> + Send + Sync,
		{
			closure: F,
		}

		impl<F> $interceptor for $closure<F>
		where
			F: for<$lt> Fn(&mut $ctx<$lt>) -> Result<()> + Send + Sync,
		{
			fn intercept<$lt>(&self, ctx: &mut $ctx<$lt>) -> Result<()> {
				(self.closure)(ctx)
			}
		}

		pub fn $ctor<F>(f: F) -> $closure<F>
		where
			F: for<$lt> Fn(&mut $ctx<$lt>) -> Result<()> + Send + Sync + 'static,
		{
			$closure {
				closure: f,
			}
		}
	};
}

table_interceptor!(
	/// Runs first in the before phase of an insert, ahead of defaulting.
	TableProposeInsertContext<'a> { row: &'a mut Row },
	TableProposeInsertInterceptor, ClosureTableProposeInsertInterceptor, table_propose_insert
);

table_interceptor!(
	/// Runs last in the before phase of an insert, after validation.
	TablePreInsertContext<'a> { row: &'a Row },
	TablePreInsertInterceptor, ClosureTablePreInsertInterceptor, table_pre_insert
);

table_interceptor!(
	TablePostInsertContext<'a> { row: &'a Row },
	TablePostInsertInterceptor, ClosureTablePostInsertInterceptor, table_post_insert
);

table_interceptor!(
	TableProposeUpdateContext<'a> { old: &'a Row, new: &'a mut Row },
	TableProposeUpdateInterceptor, ClosureTableProposeUpdateInterceptor, table_propose_update
);

table_interceptor!(
	TablePreUpdateContext<'a> { old: &'a Row, new: &'a Row },
	TablePreUpdateInterceptor, ClosureTablePreUpdateInterceptor, table_pre_update
);

table_interceptor!(
	TablePostUpdateContext<'a> { old: &'a Row, new: &'a Row },
	TablePostUpdateInterceptor, ClosureTablePostUpdateInterceptor, table_post_update
);

table_interceptor!(
	TablePreDeleteContext<'a> { old: &'a Row },
	TablePreDeleteInterceptor, ClosureTablePreDeleteInterceptor, table_pre_delete
);

table_interceptor!(
	TablePostDeleteContext<'a> { old: &'a Row },
	TablePostDeleteInterceptor, ClosureTablePostDeleteInterceptor, table_post_delete
);

#[cfg(test)]
mod tests {
	use std::sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	};

	use relcore_plan::TableVar;
	use relcore_type::{Row, Type, Value, error::diagnostic::internal::internal};

	use super::*;

	#[test]
	fn test_propose_can_alter_row() {
		let table = TableVar::builder("T").column("ID", Type::Int4).build();
		let mut chain: InterceptorChain<dyn TableProposeInsertInterceptor + Send + Sync> = InterceptorChain::new();
		chain.add(Arc::new(table_propose_insert(|ctx| {
			ctx.row.set(0, Value::int4(42));
			Ok(())
		})));

		let mut row = Row::new(table.row_type.clone());
		chain.execute(TableProposeInsertContext::new(&table, &mut row)).unwrap();
		assert_eq!(row.get(0), &Value::int4(42));
	}

	#[test]
	fn test_chain_stops_at_first_error() {
		let table = TableVar::builder("T").column("ID", Type::Int4).build();
		let calls = Arc::new(AtomicUsize::new(0));
		let mut chain: InterceptorChain<dyn TablePreDeleteInterceptor + Send + Sync> = InterceptorChain::new();
		chain.add(Arc::new(table_pre_delete(|_| Err(relcore_type::Error(internal("refused"))))));
		let counter = calls.clone();
		chain.add(Arc::new(table_pre_delete(move |_| {
			counter.fetch_add(1, Ordering::SeqCst);
			Ok(())
		})));

		let row = Row::new(table.row_type.clone());
		assert!(chain.execute(TablePreDeleteContext::new(&table, &row)).is_err());
		assert_eq!(calls.load(Ordering::SeqCst), 0);
	}
}
