// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::engine::Classifier;
use crate::errors::BuildError;
use crate::traits::Unit;

/// A duplication batch of units plus the arguments they did not consume.
pub type UnitBatch = (Vec<Box<dyn Unit>>, Vec<String>);

/// Turns a node's raw arguments into units.
///
/// Any `FnMut(&[String]) -> Result<UnitBatch, BuildError>` closure is a
/// factory, which is how callers thread their own context through a build.
pub trait UnitFactory {
    fn create(&mut self, argv: &[String]) -> Result<UnitBatch, BuildError>;

    /// Routing function for a switch from `source` into `targets`. `None`
    /// selects the default integer classifier.
    fn classifier(&mut self, _source: usize, _targets: &[usize]) -> Option<Classifier> {
        None
    }
}

impl<F> UnitFactory for F
where
    F: FnMut(&[String]) -> Result<UnitBatch, BuildError>,
{
    fn create(&mut self, argv: &[String]) -> Result<UnitBatch, BuildError> {
        self(argv)
    }
}
