use crate::{
    color::codec,
    foundation::error::{ForgeError, ForgeResult},
};

/// Byte order used when a packed 16-bit value is written to an artifact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    /// Low byte first.
    #[default]
    Little,
    /// High byte first (network order).
    Big,
}

impl ByteOrder {
    /// Serialize one packed value.
    pub fn to_bytes(self, v: u16) -> [u8; 2] {
        match self {
            Self::Little => v.to_le_bytes(),
            Self::Big => v.to_be_bytes(),
        }
    }

    /// Deserialize one packed value.
    pub fn from_bytes(self, b: [u8; 2]) -> u16 {
        match self {
            Self::Little => u16::from_le_bytes(b),
            Self::Big => u16::from_be_bytes(b),
        }
    }
}

/// At-rest encoding of packed colours for one artifact.
///
/// Artifacts carry no header, so the policy used to write a file must travel with the asset's
/// build rule and be supplied again to anything that decodes it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ColorFormatPolicy {
    /// Byte order of each 16-bit word.
    #[serde(default)]
    pub byte_order: ByteOrder,
    /// Complement every packed value before writing.
    #[serde(default)]
    pub invert: bool,
    /// Apply [`codec::byte_swap`] to every packed value before writing.
    #[serde(default)]
    pub byte_swap: bool,
}

impl ColorFormatPolicy {
    /// Apply the value transforms (swap, then invert) to a freshly encoded value.
    pub fn apply(self, packed: u16) -> u16 {
        let mut v = packed;
        if self.byte_swap {
            v = codec::byte_swap(v);
        }
        if self.invert {
            v = codec::invert(v);
        }
        v
    }

    /// Undo [`Self::apply`].
    pub fn unapply(self, stored: u16) -> u16 {
        let mut v = stored;
        if self.invert {
            v = codec::invert(v);
        }
        if self.byte_swap {
            v = codec::byte_swap(v);
        }
        v
    }
}

/// Named policies observed across the deployed asset classes.
///
/// These are kept distinct: whether `SwappedInvertedLittleEndian` and
/// `InvertedBigEndian` target different panel revisions or are an inconsistency is unresolved,
/// so neither is folded into the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PolicyPreset {
    /// Little-endian, no transforms (screensaver frames).
    #[serde(rename = "plain-le")]
    PlainLittleEndian,
    /// Big-endian, no transforms (trail/background conversions).
    #[serde(rename = "plain-be")]
    PlainBigEndian,
    /// Big-endian with inversion (dark-theme backgrounds).
    #[serde(rename = "inverted-be")]
    InvertedBigEndian,
    /// Byte swap plus inversion, written little-endian (boot splash).
    #[serde(rename = "swapped-inverted-le")]
    SwappedInvertedLittleEndian,
}

impl PolicyPreset {
    /// All presets, in documentation order.
    pub const ALL: [PolicyPreset; 4] = [
        Self::PlainLittleEndian,
        Self::PlainBigEndian,
        Self::InvertedBigEndian,
        Self::SwappedInvertedLittleEndian,
    ];

    /// Manifest / CLI name.
    pub fn name(self) -> &'static str {
        match self {
            Self::PlainLittleEndian => "plain-le",
            Self::PlainBigEndian => "plain-be",
            Self::InvertedBigEndian => "inverted-be",
            Self::SwappedInvertedLittleEndian => "swapped-inverted-le",
        }
    }

    /// Look a preset up by its manifest / CLI name.
    pub fn from_name(name: &str) -> ForgeResult<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|p| p.name()).collect();
                ForgeError::validation(format!(
                    "unknown colour policy '{name}' (known: {})",
                    known.join(", ")
                ))
            })
    }

    /// Expand to the concrete policy.
    pub fn policy(self) -> ColorFormatPolicy {
        match self {
            Self::PlainLittleEndian => ColorFormatPolicy {
                byte_order: ByteOrder::Little,
                invert: false,
                byte_swap: false,
            },
            Self::PlainBigEndian => ColorFormatPolicy {
                byte_order: ByteOrder::Big,
                invert: false,
                byte_swap: false,
            },
            Self::InvertedBigEndian => ColorFormatPolicy {
                byte_order: ByteOrder::Big,
                invert: true,
                byte_swap: false,
            },
            Self::SwappedInvertedLittleEndian => ColorFormatPolicy {
                byte_order: ByteOrder::Little,
                invert: true,
                byte_swap: true,
            },
        }
    }
}

/// Manifest representation: a preset name or an explicit policy object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum PolicySpec {
    /// Named preset, e.g. `"inverted-be"`.
    Preset(PolicyPreset),
    /// Explicit `{ "byte_order": .., "invert": .., "byte_swap": .. }`.
    Explicit(ColorFormatPolicy),
}

impl PolicySpec {
    /// Resolve to a concrete policy.
    pub fn resolve(self) -> ColorFormatPolicy {
        match self {
            Self::Preset(p) => p.policy(),
            Self::Explicit(p) => p,
        }
    }
}

impl Default for PolicySpec {
    fn default() -> Self {
        Self::Preset(PolicyPreset::PlainLittleEndian)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/policy.rs"]
mod tests;
