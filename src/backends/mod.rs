// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Unit backend implementations.
//!
//! A backend supplies [`Unit`](crate::traits::Unit)s plus a
//! [`UnitFactory`](crate::traits::UnitFactory) that turns a node's raw
//! arguments into a duplication batch of them.
//!
//! # Available Backends
//!
//! ## Local Backend
//! In-process text units selected by the first argument:
//! - **Text Transformation**: case conversion, reversal, prefix/suffix wrapping
//! - **Text Analysis**: token counting
//! - **Shape**: splitting text into words and joining arrays back together
//!
//! ## Stub Backend (Test-Only)
//! Pass-through, failing and counting units for join and scheduler tests.
//! Not available outside test builds.
//!
//! # Examples
//!
//! ```rust
//! use the_joinery::backends::local::LocalUnitFactory;
//! use the_joinery::traits::UnitFactory;
//!
//! let argv: Vec<String> = ["wrap", "--prefix", "<", "extra"].iter().map(|s| s.to_string()).collect();
//! let (units, leftover) = LocalUnitFactory::new().create(&argv)?;
//!
//! assert_eq!(units[0].name(), "wrap");
//! assert_eq!(leftover, vec!["extra"]);
//! # Ok::<(), the_joinery::errors::BuildError>(())
//! ```

pub mod local;
#[cfg(test)]
pub mod stub;
