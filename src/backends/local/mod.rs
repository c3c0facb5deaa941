// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod factory;
pub mod units;

pub use factory::LocalUnitFactory;
pub use units::*;
