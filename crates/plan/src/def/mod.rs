// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod constraint;
pub mod event;
pub mod operator;
pub mod scalar;
pub mod table;
