use ratatui::style::{Color, Modifier, Style};

/// Selectable colour schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSchemeId {
    Default = 0,
    Monochrome = 1,
    LightTerminal = 2,
    DarkVivid = 3,
}

impl ColorSchemeId {
    pub fn all() -> &'static [ColorSchemeId] {
        &[
            ColorSchemeId::Default,
            ColorSchemeId::Monochrome,
            ColorSchemeId::LightTerminal,
            ColorSchemeId::DarkVivid,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorSchemeId::Default => "Default",
            ColorSchemeId::Monochrome => "Monochrome",
            ColorSchemeId::LightTerminal => "Light Terminal",
            ColorSchemeId::DarkVivid => "Dark Vivid",
        }
    }

    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => ColorSchemeId::Default,
            1 => ColorSchemeId::Monochrome,
            2 => ColorSchemeId::LightTerminal,
            3 => ColorSchemeId::DarkVivid,
            _ => ColorSchemeId::Default,
        }
    }

    /// The scheme after this one, wrapping around
    pub fn next(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|id| id == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

/// All colour slots used by the panel
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub bg: Color,

    // Activity panel
    pub border: Color,
    pub title: Color,
    pub label: Color,
    pub download: Color,
    pub upload: Color,
    pub online: Color,
    pub offline: Color,
    pub totals: Color,
    pub sparkline: Color,
    pub gauge: Color,
    pub gauge_bg: Color,
    pub status_text: Color,

    // Footer
    pub footer_key_fg: Color,
    pub footer_key_bg: Color,
    pub footer_label_fg: Color,
    pub footer_label_bg: Color,

    // Popups
    pub popup_border: Color,
    pub popup_bg: Color,
    pub popup_title: Color,
    pub popup_text: Color,
}

impl ColorScheme {
    pub fn from_id(id: ColorSchemeId) -> Self {
        match id {
            ColorSchemeId::Default => Self::default_scheme(),
            ColorSchemeId::Monochrome => Self::monochrome(),
            ColorSchemeId::LightTerminal => Self::light_terminal(),
            ColorSchemeId::DarkVivid => Self::dark_vivid(),
        }
    }

    fn default_scheme() -> Self {
        Self {
            bg: Color::Reset,

            border: Color::Cyan,
            title: Color::Cyan,
            label: Color::White,
            download: Color::Green,
            upload: Color::Yellow,
            online: Color::Green,
            offline: Color::Red,
            totals: Color::DarkGray,
            sparkline: Color::Green,
            gauge: Color::Red,
            gauge_bg: Color::DarkGray,
            status_text: Color::Gray,

            footer_key_fg: Color::Black,
            footer_key_bg: Color::Cyan,
            footer_label_fg: Color::Indexed(252),
            footer_label_bg: Color::Indexed(234),

            popup_border: Color::Cyan,
            popup_bg: Color::Black,
            popup_title: Color::Cyan,
            popup_text: Color::White,
        }
    }

    /// Monochrome (no colors)
    fn monochrome() -> Self {
        Self {
            bg: Color::Reset,

            border: Color::White,
            title: Color::White,
            label: Color::White,
            download: Color::White,
            upload: Color::White,
            online: Color::White,
            offline: Color::DarkGray,
            totals: Color::DarkGray,
            sparkline: Color::White,
            gauge: Color::White,
            gauge_bg: Color::DarkGray,
            status_text: Color::White,

            footer_key_fg: Color::Black,
            footer_key_bg: Color::White,
            footer_label_fg: Color::White,
            footer_label_bg: Color::Black,

            popup_border: Color::White,
            popup_bg: Color::Black,
            popup_title: Color::White,
            popup_text: Color::White,
        }
    }

    /// For light terminal backgrounds
    fn light_terminal() -> Self {
        Self {
            bg: Color::Reset,

            border: Color::Blue,
            title: Color::Blue,
            label: Color::Black,
            download: Color::Indexed(28),
            upload: Color::Indexed(130),
            online: Color::Indexed(28),
            offline: Color::Red,
            totals: Color::Indexed(242),
            sparkline: Color::Blue,
            gauge: Color::Red,
            gauge_bg: Color::Indexed(250),
            status_text: Color::Indexed(238),

            footer_key_fg: Color::White,
            footer_key_bg: Color::Blue,
            footer_label_fg: Color::Black,
            footer_label_bg: Color::Indexed(253),

            popup_border: Color::Blue,
            popup_bg: Color::White,
            popup_title: Color::Blue,
            popup_text: Color::Black,
        }
    }

    /// Vivid dark colors with contrast
    fn dark_vivid() -> Self {
        Self {
            bg: Color::Black,

            border: Color::LightMagenta,
            title: Color::LightCyan,
            label: Color::White,
            download: Color::LightGreen,
            upload: Color::LightYellow,
            online: Color::LightGreen,
            offline: Color::LightRed,
            totals: Color::Gray,
            sparkline: Color::LightCyan,
            gauge: Color::LightMagenta,
            gauge_bg: Color::Indexed(236),
            status_text: Color::White,

            footer_key_fg: Color::Black,
            footer_key_bg: Color::LightMagenta,
            footer_label_fg: Color::White,
            footer_label_bg: Color::Black,

            popup_border: Color::LightMagenta,
            popup_bg: Color::Black,
            popup_title: Color::LightCyan,
            popup_text: Color::White,
        }
    }

    pub fn label_style(&self) -> Style {
        Style::default().fg(self.label).bg(self.bg)
    }

    pub fn speed_style(&self, color: Color) -> Style {
        Style::default().fg(color).bg(self.bg).add_modifier(Modifier::BOLD)
    }

    pub fn footer_key_style(&self) -> Style {
        Style::default()
            .fg(self.footer_key_fg)
            .bg(self.footer_key_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn footer_label_style(&self) -> Style {
        Style::default().fg(self.footer_label_fg).bg(self.footer_label_bg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_wraps_around() {
        assert_eq!(ColorSchemeId::Default.next(), ColorSchemeId::Monochrome);
        assert_eq!(ColorSchemeId::DarkVivid.next(), ColorSchemeId::Default);
    }

    #[test]
    fn out_of_range_index_falls_back_to_default() {
        assert_eq!(ColorSchemeId::from_index(42), ColorSchemeId::Default);
        for id in ColorSchemeId::all() {
            assert_eq!(ColorSchemeId::from_index(*id as usize), *id);
        }
    }
}
