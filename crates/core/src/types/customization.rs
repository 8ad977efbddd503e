//! Sign customization: text, font, and color.
//!
//! The configurator lets a customer compose one line of text, pick a font
//! and a color, and see the letter-count price. Fonts and colors are closed
//! enums so an order can never carry a style the workshop cannot build.

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`SignText`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum SignTextError {
    /// The text is empty.
    #[error("sign text cannot be empty")]
    Empty,
    /// The text is longer than the configurator allows.
    #[error("sign text must be at most {max} characters")]
    TooLong {
        /// Maximum allowed character count.
        max: usize,
    },
}

/// The text of a custom neon sign.
///
/// Between 1 and 10 characters. The configurator clamps input at 10, but
/// the service re-validates: the price tiers stop at 10 letters and the
/// workshop does not produce longer signs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct SignText(String);

impl SignText {
    /// Maximum number of characters on a sign.
    pub const MAX_LENGTH: usize = 10;

    /// Parse sign text, rejecting empty or over-long input.
    ///
    /// # Errors
    ///
    /// Returns [`SignTextError::Empty`] for an empty string and
    /// [`SignTextError::TooLong`] above [`Self::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, SignTextError> {
        if s.is_empty() {
            return Err(SignTextError::Empty);
        }

        if s.chars().count() > Self::MAX_LENGTH {
            return Err(SignTextError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the text as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters on the sign (not bytes).
    #[must_use]
    pub fn letter_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl std::fmt::Display for SignText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fonts the workshop can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignFont {
    Dancing,
    Roboto,
    Playfair,
    Pacifico,
    Montserrat,
}

impl SignFont {
    /// All fonts, in configurator display order.
    pub const ALL: [Self; 5] = [
        Self::Dancing,
        Self::Roboto,
        Self::Playfair,
        Self::Pacifico,
        Self::Montserrat,
    ];

    /// Display name shown in the configurator.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Dancing => "Dancing Script",
            Self::Roboto => "Roboto",
            Self::Playfair => "Playfair Display",
            Self::Pacifico => "Pacifico",
            Self::Montserrat => "Montserrat",
        }
    }
}

/// LED tube colors the workshop stocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignColor {
    Purple,
    Blue,
    Pink,
    Red,
    Green,
    Yellow,
    White,
}

impl SignColor {
    /// All colors, in configurator display order.
    pub const ALL: [Self; 7] = [
        Self::Purple,
        Self::Blue,
        Self::Pink,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::White,
    ];

    /// Tube color as a CSS hex value.
    #[must_use]
    pub const fn hex(&self) -> &'static str {
        match self {
            Self::Purple => "#8B5CF6",
            Self::Blue => "#3B82F6",
            Self::Pink => "#EC4899",
            Self::Red => "#EF4444",
            Self::Green => "#10B981",
            Self::Yellow => "#F59E0B",
            Self::White => "#FFFFFF",
        }
    }

    /// Glow color used for the preview halo.
    #[must_use]
    pub const fn glow(&self) -> &'static str {
        match self {
            Self::Purple => "#6D28D9",
            Self::Blue => "#1D4ED8",
            Self::Pink => "#BE185D",
            Self::Red => "#B91C1C",
            Self::Green => "#047857",
            Self::Yellow => "#B45309",
            Self::White => "#A1A1AA",
        }
    }
}

/// A customer's configuration for one sign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customization {
    /// The sign text (1-10 characters).
    pub text: SignText,
    /// Chosen font.
    pub font: SignFont,
    /// Chosen tube color.
    pub color: SignColor,
}

impl Customization {
    /// Number of letters on the sign, derived from the text.
    #[must_use]
    pub fn letter_count(&self) -> usize {
        self.text.letter_count()
    }
}
