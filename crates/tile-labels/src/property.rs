//! String-valued placement properties resolved by the style pipeline

use crate::LabelError;
use glam::Vec2;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which side of the label sits on its anchor point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Anchor {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Anchor {
    /// Screen-space shift applied to a label of size `dimension`
    pub fn offset(self, dimension: Vec2) -> Vec2 {
        let half = dimension * 0.5;
        match self {
            Anchor::Center => Vec2::ZERO,
            Anchor::Left => Vec2::new(-half.x, 0.0),
            Anchor::Right => Vec2::new(half.x, 0.0),
            Anchor::Bottom => Vec2::new(0.0, half.y),
            Anchor::Top => Vec2::new(0.0, -half.y),
            Anchor::BottomLeft => Vec2::new(-half.x, half.y),
            Anchor::BottomRight => Vec2::new(half.x, half.y),
            Anchor::TopLeft => Vec2::new(-half.x, -half.y),
            Anchor::TopRight => Vec2::new(half.x, -half.y),
        }
    }
}

impl FromStr for Anchor {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center" => Ok(Anchor::Center),
            "top" => Ok(Anchor::Top),
            "bottom" => Ok(Anchor::Bottom),
            "left" => Ok(Anchor::Left),
            "right" => Ok(Anchor::Right),
            "top-left" => Ok(Anchor::TopLeft),
            "top-right" => Ok(Anchor::TopRight),
            "bottom-left" => Ok(Anchor::BottomLeft),
            "bottom-right" => Ok(Anchor::BottomRight),
            other => Err(LabelError::UnknownAnchor(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_from_str() {
        assert_eq!("bottom-left".parse::<Anchor>().unwrap(), Anchor::BottomLeft);
        assert_eq!("center".parse::<Anchor>().unwrap(), Anchor::Center);
        assert!(matches!(
            "middle".parse::<Anchor>(),
            Err(LabelError::UnknownAnchor(name)) if name == "middle"
        ));
    }

    #[test]
    fn test_anchor_offset() {
        let dim = Vec2::new(20.0, 10.0);
        assert_eq!(Anchor::Center.offset(dim), Vec2::ZERO);
        assert_eq!(Anchor::Left.offset(dim), Vec2::new(-10.0, 0.0));
        assert_eq!(Anchor::TopRight.offset(dim), Vec2::new(10.0, -5.0));
        assert_eq!(Anchor::BottomRight.offset(dim), Vec2::new(10.0, 5.0));
    }
}
