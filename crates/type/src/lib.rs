// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod error;
pub mod value;

pub use error::{Diagnostic, Error, ErrorClass, IntoDiagnostic, Result, Severity};
pub use value::{OrderedF64, Row, RowType, Type, Value, ValueFlags};
