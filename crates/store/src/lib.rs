// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod device;
mod handle;
mod store;
mod table;
mod undo;

pub use device::Device;
pub use handle::TableHandle;
pub use store::{Store, StoreInner};
pub use table::{RowId, TableData};
pub use undo::{Change, UndoEntry};
