// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Panel directions and the collapsed-panel transform.

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use kurbo::{Affine, Size, Vec2};

use crate::error::PopoverError;

/// Where the panel opens relative to the trigger.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Centered on the trigger.
    #[default]
    C,
    /// North.
    N,
    /// North-east.
    Ne,
    /// East.
    E,
    /// South-east.
    Se,
    /// South.
    S,
    /// South-west.
    Sw,
    /// West.
    W,
    /// North-west.
    Nw,
}

impl Direction {
    /// Every direction.
    pub const ALL: [Self; 9] = [
        Self::C,
        Self::N,
        Self::Ne,
        Self::E,
        Self::Se,
        Self::S,
        Self::Sw,
        Self::W,
        Self::Nw,
    ];

    /// Short name: `c`, `n`, `ne`, ...
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::C => "c",
            Self::N => "n",
            Self::Ne => "ne",
            Self::E => "e",
            Self::Se => "se",
            Self::S => "s",
            Self::Sw => "sw",
            Self::W => "w",
            Self::Nw => "nw",
        }
    }

    /// Panel class for this direction, e.g. `pop-ne`.
    pub fn class(self) -> String {
        let mut class = String::from("pop-");
        class.push_str(self.as_str());
        class
    }

    /// Panel translation as a fraction of the panel's own size.
    ///
    /// Centered panels are pulled back by half on both axes, cardinal ones on
    /// the cross axis only. Diagonals stay put.
    pub const fn anchor_fraction(self) -> Vec2 {
        match self {
            Self::C => Vec2::new(-0.5, -0.5),
            Self::N | Self::S => Vec2::new(-0.5, 0.0),
            Self::E | Self::W => Vec2::new(0.0, -0.5),
            Self::Ne | Self::Se | Self::Sw | Self::Nw => Vec2::ZERO,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = PopoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| PopoverError::UnknownDirection(s.to_string()))
    }
}

/// Transform applied to the collapsed panel: translate, then scale.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PanelTransform {
    /// Translation in panel units.
    pub translate: Vec2,
    /// Per-axis scale.
    pub scale: Vec2,
}

impl PanelTransform {
    /// Fit the panel so it collapses onto the trigger.
    ///
    /// `item` is the first item's layout size and `count` the number of items.
    /// Returns `None` when there are no items or the item has no area.
    pub fn fit(
        direction: Direction,
        trigger: Size,
        item: Size,
        count: usize,
        panel: Size,
    ) -> Option<Self> {
        if count == 0 || item.width <= 0.0 || item.height <= 0.0 {
            return None;
        }
        let scale = Vec2::new(
            trigger.width / 4.0 / item.width,
            trigger.height / 4.0 / (item.height * count as f64),
        );
        let frac = direction.anchor_fraction();
        Some(Self {
            translate: Vec2::new(frac.x * panel.width, frac.y * panel.height),
            scale,
        })
    }

    /// The affine `translate · scale`.
    pub fn to_affine(self) -> Affine {
        Affine::translate(self.translate) * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }
}
