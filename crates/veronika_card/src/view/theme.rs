//! Host theme variables and icon names.
//!
//! Colors are never hard-coded: every color is a CSS custom property read from
//! the host's active theme, with the fallback the host convention provides
//! for the few that may be missing from older themes.

use strum::Display;
use strum::IntoStaticStr;

/// A color from the host theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ThemeColor {
    PrimaryColor,
    ErrorColor,
    SuccessColor,
    SecondaryTextColor,
    TextPrimaryColor,
    SecondaryBackgroundColor,
    DividerColor,
}

impl ThemeColor {
    /// Name of the custom property, without the leading dashes.
    pub fn property(self) -> &'static str {
        self.into()
    }

    fn fallback(self) -> Option<&'static str> {
        match self {
            ThemeColor::ErrorColor => Some("#f44336"),
            ThemeColor::SuccessColor => Some("#4caf50"),
            _ => None,
        }
    }

    /// CSS `var()` expression for this color.
    pub fn var(self) -> String {
        match self.fallback() {
            Some(fallback) => format!("var(--{}, {})", self.property(), fallback),
            None => format!("var(--{})", self.property()),
        }
    }
}

/// Material Design icon used by the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Icon {
    #[strum(serialize = "mdi:check-circle")]
    CheckCircle,
    #[strum(serialize = "mdi:toggle-switch-off-outline")]
    ToggleOff,
    #[strum(serialize = "mdi:alert-circle")]
    AlertCircle,
    #[strum(serialize = "mdi:circle-outline")]
    CircleOutline,
    #[strum(serialize = "mdi:robot-vacuum")]
    RobotVacuum,
    #[strum(serialize = "mdi:play")]
    Play,
    #[strum(serialize = "mdi:stop")]
    Stop,
    #[strum(serialize = "mdi:bug")]
    Bug,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_expressions() {
        assert_eq!(ThemeColor::PrimaryColor.var(), "var(--primary-color)");
        assert_eq!(ThemeColor::SuccessColor.var(), "var(--success-color, #4caf50)");
        assert_eq!(ThemeColor::ErrorColor.var(), "var(--error-color, #f44336)");
        assert_eq!(
            ThemeColor::SecondaryBackgroundColor.var(),
            "var(--secondary-background-color)"
        );
    }

    #[test]
    fn test_icon_names() {
        assert_eq!(Icon::ToggleOff.to_string(), "mdi:toggle-switch-off-outline");
        assert_eq!(Icon::RobotVacuum.to_string(), "mdi:robot-vacuum");
    }
}
