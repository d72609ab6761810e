//! RGB pixel color.

use std::ops::BitXor;

use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGB color.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// All channels off.
    pub const BLACK: Self = Self(0, 0, 0);
    /// Full red.
    pub const RED: Self = Self(255, 0, 0);
    /// Full green.
    pub const GREEN: Self = Self(0, 255, 0);
    /// Full blue.
    pub const BLUE: Self = Self(0, 0, 255);
    /// All channels full.
    pub const WHITE: Self = Self(255, 255, 255);

    /// Color from its three channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(r, g, b)
    }

    /// Whether every channel is zero.
    #[must_use]
    pub const fn is_black(self) -> bool {
        self.0 == 0 && self.1 == 0 && self.2 == 0
    }
}

/// Per-channel XOR. Commutative and associative, which makes it usable for
/// blending equal-height contributions in any order.
impl BitXor for Color {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0, self.1 ^ rhs.1, self.2 ^ rhs.2)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self(r, g, b)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self(r, g, b)
    }
}
