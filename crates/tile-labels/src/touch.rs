//! Hit-test results

use crate::label::Properties;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::Serialize;

/// An interactive label found near a query point
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TouchItem {
    /// Feature properties attached to the label, if any
    pub properties: Option<Arc<Properties>>,
    /// Screen-space centre of the label
    pub position: [f32; 2],
    /// Distance from the query point to `position`
    pub distance: f32,
}
