// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use relcore_plan::TableVar;
use relcore_store::{Change, Device, TableData, UndoEntry};
use relcore_transaction::Undo;
use relcore_type::Result;
use tracing::{debug, trace};

use crate::Context;

impl Context {
	/// The execute phase. Inside an application transaction's global context
	/// the change lands in the overlay and is logged for replay; otherwise the
	/// table's device is offered it first and the generic representation
	/// takes it when the device refuses.
	pub(super) fn apply_change(&mut self, table: &Arc<TableVar>, change: Change) -> Result<()> {
		if let Some(app) = self.active_app() {
			if !matches!(change, Change::Inserted(_)) {
				self.populate_table(&app, table)?;
			}
			let overlay = app.overlay(table);
			overlay.with_mut(|data| apply(data, &change))?;
			trace!(app = %app.id(), table = %table.name, "change staged");
			self.transactions.record(Undo::Row(UndoEntry::new(overlay, change.clone())));
			app.record(table, change);
			self.transactions.record(Undo::AppOperation(app));
			return Ok(());
		}

		let handle = self.services.store.handle(table);
		let device = self.services.store.device(&table.name);
		handle.with_mut(|data| {
			if let Some(device) = &device {
				if offer(device.as_ref(), data, &change)? {
					trace!(device = device.name(), table = %table.name, "device executed change");
					return Ok(());
				}
				debug!(device = device.name(), table = %table.name, "device refused change");
			}
			apply(data, &change)
		})?;
		self.transactions.record(Undo::Row(UndoEntry::new(handle, change)));
		Ok(())
	}
}

fn apply(data: &mut TableData, change: &Change) -> Result<()> {
	match change {
		Change::Inserted(row) => data.insert(row).map(|_| ()),
		Change::Updated {
			old,
			new,
		} => data.update(old, new),
		Change::Deleted(row) => data.delete(row),
	}
}

fn offer(device: &dyn Device, data: &mut TableData, change: &Change) -> Result<bool> {
	match change {
		Change::Inserted(row) => device.execute_insert(data, row),
		Change::Updated {
			old,
			new,
		} => device.execute_update(data, old, new),
		Change::Deleted(row) => device.execute_delete(data, row),
	}
}
