//! Physics layers and layer masks.
//!
//! Every collider the ray query can report sits on exactly one [`Layer`]
//! (0..=31). A [`LayerMask`] is a set of layers; the beam tracer uses masks
//! to decide what to ignore, what reflects, and which hits are connectors
//! or enemies.

use serde::{Deserialize, Serialize};
use std::ops::{BitAnd, BitOr, Not};

/// Highest valid layer index.
pub const MAX_LAYER: u8 = 31;

/// A single physics layer, 0..=31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Layer(u8);

impl Layer {
    /// The layer every collider lands on unless told otherwise.
    pub const DEFAULT: Layer = Layer(0);

    /// Create a layer, or `None` if the index is above [`MAX_LAYER`].
    pub fn new(index: u8) -> Option<Self> {
        (index <= MAX_LAYER).then_some(Self(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// The single-bit mask containing only this layer.
    pub fn mask(self) -> LayerMask {
        LayerMask(1 << self.0)
    }
}

/// A set of layers packed into 32 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Build a mask from a list of layers.
    pub fn from_layers(layers: impl IntoIterator<Item = Layer>) -> Self {
        layers
            .into_iter()
            .fold(LayerMask::NONE, |mask, layer| mask | layer.mask())
    }

    /// Whether `layer` is a member of this mask.
    pub fn contains(self, layer: Layer) -> bool {
        self.0 & (1 << layer.0) != 0
    }

    /// Whether the two masks share any layer.
    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the member layers in ascending order.
    pub fn layers(self) -> impl Iterator<Item = Layer> {
        (0..=MAX_LAYER)
            .map(Layer)
            .filter(move |layer| self.contains(*layer))
    }
}

impl From<Layer> for LayerMask {
    fn from(layer: Layer) -> Self {
        layer.mask()
    }
}

impl BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: LayerMask) -> LayerMask {
        LayerMask(self.0 | rhs.0)
    }
}

impl BitAnd for LayerMask {
    type Output = LayerMask;

    fn bitand(self, rhs: LayerMask) -> LayerMask {
        LayerMask(self.0 & rhs.0)
    }
}

impl Not for LayerMask {
    type Output = LayerMask;

    fn not(self) -> LayerMask {
        LayerMask(!self.0)
    }
}
