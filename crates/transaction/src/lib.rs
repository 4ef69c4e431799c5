// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

// #![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod app;
mod deferred;
pub mod interceptor;
mod transaction;

pub use app::{AppGuard, AppOperation, AppTransactionId, ApplicationTransaction};
pub use deferred::{DeferredCheck, DeferredHandler, Transition};
pub use interceptor::Interceptors;
pub use transaction::{Savepoint, Transaction, TransactionStack, Undo};
