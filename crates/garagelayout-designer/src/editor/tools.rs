//! Placement tools and the selection handle.

use garagelayout_core::{Device, ElementType, LayoutElement};
use serde::{Deserialize, Serialize};

/// Active palette tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    None,
    Entrance,
    Lane,
    Spot,
    Curve,
    Ramp,
}

impl Tool {
    /// Element type placed by this tool.
    pub fn element_type(self) -> Option<ElementType> {
        match self {
            Tool::None => None,
            Tool::Entrance => Some(ElementType::Entrance),
            Tool::Lane => Some(ElementType::Lane),
            Tool::Spot => Some(ElementType::Spot),
            Tool::Curve => Some(ElementType::Curve),
            Tool::Ramp => Some(ElementType::Ramp),
        }
    }

    /// Result of clicking this tool's button while `self` is active.
    pub fn toggled(self, clicked: Tool) -> Tool {
        if self == clicked {
            Tool::None
        } else {
            clicked
        }
    }
}

impl From<ElementType> for Tool {
    fn from(value: ElementType) -> Self {
        match value {
            ElementType::Spot => Tool::Spot,
            ElementType::Lane => Tool::Lane,
            ElementType::Curve => Tool::Curve,
            ElementType::Entrance => Tool::Entrance,
            ElementType::Ramp => Tool::Ramp,
        }
    }
}

/// Current selection. A device and a layout element can never be selected
/// at the same time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selected {
    #[default]
    None,
    Device(Device),
    LayoutElement(LayoutElement),
}

impl Selected {
    pub fn device(&self) -> Option<&Device> {
        match self {
            Selected::Device(d) => Some(d),
            _ => None,
        }
    }

    pub fn layout_element(&self) -> Option<&LayoutElement> {
        match self {
            Selected::LayoutElement(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selected::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        assert_eq!(Tool::None.toggled(Tool::Spot), Tool::Spot);
        assert_eq!(Tool::Spot.toggled(Tool::Spot), Tool::None);
        assert_eq!(Tool::Spot.toggled(Tool::Lane), Tool::Lane);
    }

    #[test]
    fn test_element_type_mapping() {
        assert_eq!(Tool::None.element_type(), None);
        for t in [
            ElementType::Spot,
            ElementType::Lane,
            ElementType::Curve,
            ElementType::Entrance,
            ElementType::Ramp,
        ] {
            assert_eq!(Tool::from(t).element_type(), Some(t));
        }
    }
}
