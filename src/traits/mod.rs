// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod factory;
pub mod scheduler;
pub mod unit;

pub use factory::{UnitBatch, UnitFactory};
pub use scheduler::Scheduler;
pub use unit::Unit;
