use crate::animation::SpringConfig;
use derive_more::{AsRef, Deref, Display, From, Into};
use palette::Srgb;
use palette::rgb::FromHexError;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ItemName(String);

impl ItemName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

/// Item background color, written as `#rrggbb` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Deref, From, Into, SerializeDisplay, DeserializeFromStr)]
pub struct ItemColor(Srgb<f64>);

impl FromStr for ItemColor {
    type Err = FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rgb: Srgb<u8> = s.trim().parse()?;
        Ok(Self(rgb.into_format()))
    }
}

impl fmt::Display for ItemColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.0.into_format::<u8>().into_components();
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Item {
    pub name: ItemName,
    #[serde(default)]
    pub color: Option<ItemColor>,
}

impl Item {
    pub fn new(name: impl Into<String>, color: Option<ItemColor>) -> Self {
        Self {
            name: ItemName::new(name),
            color,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Tint {
    #[default]
    #[strum(serialize = "default")]
    Default,
    #[strum(serialize = "light")]
    Light,
    #[strum(serialize = "dark")]
    Dark,
}

/// Blur drawn behind the wheel by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct BlurOverlay {
    #[serde(default)]
    pub tint: Tint,
    pub intensity: f64,
}

/// Class names handed to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct StyleSlots {
    pub container: Option<String>,
    pub circle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Wheel diameter.
    pub size: f64,
    pub icon_size: f64,
    /// Degrees of rotation per unit of horizontal drag.
    pub drag_speed: f64,
    pub items: Vec<Item>,
    pub spring: SpringConfig,
    pub style: StyleSlots,
    pub overlay: Option<BlurOverlay>,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            size: 320.0,
            icon_size: 32.0,
            drag_speed: 1.0,
            items: Vec::new(),
            spring: SpringConfig::default(),
            style: StyleSlots::default(),
            overlay: None,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum WheelError {
    #[error("Wheel needs at least one item")]
    NoItems,
    #[error("Invalid wheel size: {0}")]
    InvalidSize(f64),
    #[error("Invalid icon size {icon_size} for a wheel of size {size}")]
    InvalidIconSize { icon_size: f64, size: f64 },
    #[error("Invalid drag speed: {0}")]
    InvalidDragSpeed(f64),
    #[error("Invalid spring: bounciness {bounciness}, speed {speed}")]
    InvalidSpring { bounciness: f64, speed: f64 },
    #[error("Overlay intensity must be within 0..=100, got {0}")]
    InvalidIntensity(f64),
}

impl WheelConfig {
    /// Checks everything the widget divides by or draws with and returns the
    /// item count.
    pub fn validate(&self) -> Result<NonZeroUsize, WheelError> {
        let count = NonZeroUsize::new(self.items.len()).ok_or(WheelError::NoItems)?;

        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(WheelError::InvalidSize(self.size));
        }
        if !self.icon_size.is_finite() || self.icon_size <= 0.0 || self.icon_size > self.size {
            return Err(WheelError::InvalidIconSize {
                icon_size: self.icon_size,
                size: self.size,
            });
        }
        if !self.drag_speed.is_finite() {
            return Err(WheelError::InvalidDragSpeed(self.drag_speed));
        }

        let SpringConfig {
            bounciness, speed, ..
        } = self.spring;
        if !bounciness.is_finite() || bounciness < 0.0 || !speed.is_finite() || speed <= 0.0 {
            return Err(WheelError::InvalidSpring { bounciness, speed });
        }

        if let Some(overlay) = &self.overlay
            && !(0.0..=100.0).contains(&overlay.intensity)
        {
            return Err(WheelError::InvalidIntensity(overlay.intensity));
        }

        Ok(count)
    }

    /// Item colors, if every item has one.
    pub fn colors(&self) -> Option<Vec<Srgb<f64>>> {
        self.items
            .iter()
            .map(|item| item.color.map(|color| *color))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn items(n: usize) -> Vec<Item> {
        (0..n).map(|i| Item::new(format!("item-{i}"), None)).collect()
    }

    #[test]
    fn test_defaults() {
        let config = WheelConfig::default();
        assert_eq!(config.size, 320.0);
        assert_eq!(config.icon_size, 32.0);
        assert_eq!(config.drag_speed, 1.0);
        assert_eq!(config.spring.delay, Duration::from_millis(8));
    }

    #[test]
    fn test_rejects_empty_items() {
        assert_eq!(WheelConfig::default().validate(), Err(WheelError::NoItems));
    }

    #[test]
    fn test_rejects_bad_geometry() {
        let config = WheelConfig {
            items: items(3),
            size: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(WheelError::InvalidSize(0.0)));

        let config = WheelConfig {
            items: items(3),
            icon_size: 400.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(WheelError::InvalidIconSize { .. })
        ));

        let config = WheelConfig {
            items: items(3),
            drag_speed: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(WheelError::InvalidDragSpeed(_))
        ));
    }

    #[test]
    fn test_rejects_bad_overlay() {
        let config = WheelConfig {
            items: items(2),
            overlay: Some(BlurOverlay {
                tint: Tint::Dark,
                intensity: 140.0,
            }),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(WheelError::InvalidIntensity(140.0)));
    }

    #[test]
    fn test_single_item_is_valid() {
        let config = WheelConfig {
            items: items(1),
            ..Default::default()
        };
        assert_eq!(config.validate().map(NonZeroUsize::get), Ok(1));
    }

    #[test]
    fn test_item_color_parsing() {
        let color: ItemColor = "#ff8000".parse().unwrap();
        assert_eq!(color.to_string(), "#ff8000");
        assert_eq!(color.red, 1.0);
        assert_eq!(color.blue, 0.0);

        let bare: ItemColor = "00ff00".parse().unwrap();
        assert_eq!(bare.green, 1.0);

        assert!("#nothex".parse::<ItemColor>().is_err());
    }

    #[test]
    fn test_colors_require_every_item() {
        let mut config = WheelConfig {
            items: vec![
                Item::new("home", "#ff0000".parse().ok()),
                Item::new("search", "#0000ff".parse().ok()),
            ],
            ..Default::default()
        };
        assert_eq!(config.colors().map(|c| c.len()), Some(2));

        config.items.push(Item::new("plain", None));
        assert_eq!(config.colors(), None);
    }

    #[test]
    fn test_deserialization() {
        let json = r##"{
            "size": 200,
            "drag_speed": 0.5,
            "items": [
                { "name": "home", "color": "#112233" },
                { "name": "star" }
            ],
            "spring": { "bounciness": 4, "delay": 20 },
            "overlay": { "tint": "Dark", "intensity": 60 }
        }"##;

        let config: WheelConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.size, 200.0);
        assert_eq!(config.icon_size, 32.0);
        assert_eq!(config.items[0].name, ItemName::new("home"));
        assert_eq!(config.items[0].color.unwrap().to_string(), "#112233");
        assert_eq!(config.items[1].color, None);
        assert_eq!(config.spring.bounciness, 4.0);
        assert_eq!(config.spring.speed, 12.0);
        assert_eq!(config.spring.delay, Duration::from_millis(20));
        assert_eq!(config.overlay.map(|o| o.tint), Some(Tint::Dark));
    }

    #[test]
    fn test_tint_deserialization() {
        let cases = vec![
            ("\"light\"", Tint::Light),
            ("\"LIGHT\"", Tint::Light),
            ("\"Dark\"", Tint::Dark),
            ("\"default\"", Tint::Default),
        ];

        for (json, expected) in cases {
            let deserialized: Tint = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }
}
