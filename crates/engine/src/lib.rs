// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

mod abort;
mod app_transaction;
mod call;
mod config;
mod context;
mod database;
mod evaluate;
mod execute;
mod mutate;
mod outcome;
mod process;
mod scope;
pub mod stack;
pub mod test_utils;

pub use abort::AbortHandle;
pub use config::EngineConfig;
pub use context::Context;
pub use database::{Database, Services};
pub use outcome::Outcome;
pub use process::Process;
pub use relcore_type::Result;
