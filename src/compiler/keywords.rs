//! Keyword leaves mapped to CSS values.
//!
//! Unknown keywords never fail compilation; each enum names the variant used
//! when a stored keyword is not recognised.

/// Parsing of a keyword leaf with a fallback variant.
pub trait Keyword: Sized + Copy {
    /// Variant used for unrecognised input.
    const FALLBACK: Self;

    fn parse_keyword(keyword: &str) -> Option<Self>;

    /// Parses `keyword`, falling back to [`FALLBACK`](Self::FALLBACK).
    fn from_keyword(keyword: &str) -> Self {
        Self::parse_keyword(keyword).unwrap_or_else(|| {
            tracing::debug!(keyword, "unknown keyword, using fallback");
            Self::FALLBACK
        })
    }
}

/// Screen edge the menu is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Toggle border-radius: the rounded corners face away from the edge.
    pub fn toggle_radius(self, radius: &str) -> String {
        match self {
            Self::Left => format!("0 {radius}px {radius}px 0"),
            Self::Right => format!("{radius}px 0 0 {radius}px"),
        }
    }

    /// Flex `order` of the nav and the toggle.
    pub fn orders(self) -> (&'static str, &'static str) {
        match self {
            Self::Left => ("1", "2"),
            Self::Right => ("2", "1"),
        }
    }
}

impl Keyword for Side {
    const FALLBACK: Self = Self::Right;

    fn parse_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// `toggle.align`: where the toggle sits along the menu's height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAlign {
    Top,
    Middle,
    Bottom,
}

impl ToggleAlign {
    pub fn flex_value(self) -> &'static str {
        match self {
            Self::Top => "flex-start",
            Self::Middle => "center",
            Self::Bottom => "flex-end",
        }
    }
}

impl Keyword for ToggleAlign {
    const FALLBACK: Self = Self::Middle;

    fn parse_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "top" => Some(Self::Top),
            "middle" => Some(Self::Middle),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }
}

/// `icon.align`: horizontal placement of icon and label in an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAlign {
    Left,
    Center,
    Right,
}

impl ItemAlign {
    pub fn flex_value(self) -> &'static str {
        match self {
            Self::Left => "flex-start",
            Self::Center => "center",
            Self::Right => "flex-end",
        }
    }
}

impl Keyword for ItemAlign {
    const FALLBACK: Self = Self::Center;

    fn parse_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// `icon.position`: icon above the label or beside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconPosition {
    Top,
    Inline,
}

impl IconPosition {
    pub fn flex_direction(self) -> &'static str {
        match self {
            Self::Top => "column",
            Self::Inline => "row",
        }
    }
}

impl Keyword for IconPosition {
    const FALLBACK: Self = Self::Inline;

    fn parse_keyword(keyword: &str) -> Option<Self> {
        Some(if keyword == "top" { Self::Top } else { Self::Inline })
    }
}

/// `item.first_last_radius`: how the outermost items are rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRadius {
    /// First and last items are square.
    None,
    /// Every item uses `item.border_radius`.
    Item,
    /// First and last items follow the container's corners.
    Container,
}

impl Keyword for EdgeRadius {
    const FALLBACK: Self = Self::Container;

    fn parse_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "none" => Some(Self::None),
            "item" => Some(Self::Item),
            "container" => Some(Self::Container),
            _ => None,
        }
    }
}

/// `animation.type`: how the menu collapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Slide,
    Fade,
    Scale,
}

impl Keyword for AnimationKind {
    const FALLBACK: Self = Self::Slide;

    fn parse_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "slide" => Some(Self::Slide),
            "fade" => Some(Self::Fade),
            "scale" => Some(Self::Scale),
            _ => None,
        }
    }
}
