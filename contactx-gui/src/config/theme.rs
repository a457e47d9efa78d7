use serde::{Deserialize, Serialize};
use strum::Display;

/// Colour themes selectable from `gui.toml`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    GruvboxDark,
    KanagawaDragon,
    Nord,
}

impl From<&Theme> for iced::Theme {
    fn from(theme: &Theme) -> Self {
        match theme {
            Theme::Dark => iced::Theme::Dark,
            Theme::Light => iced::Theme::Light,
            Theme::GruvboxDark => iced::Theme::GruvboxDark,
            Theme::KanagawaDragon => iced::Theme::KanagawaDragon,
            Theme::Nord => iced::Theme::Nord,
        }
    }
}
