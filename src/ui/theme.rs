use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,

    // Header and footer chrome
    pub title_style: Style,
    pub subtitle_style: Style,
    pub tagline_style: Style,
    pub footer_style: Style,
    pub empty_state_title_style: Style,
    pub empty_state_text_style: Style,

    // Transcript
    pub user_label_style: Style,
    pub user_text_style: Style,
    pub model_label_style: Style,
    pub model_text_style: Style,
    pub error_text_style: Style,
    pub timestamp_style: Style,
    pub attachment_style: Style,
    pub loading_style: Style,

    // Markdown
    pub md_heading_style: Style,
    pub md_inline_code_style: Style,
    pub md_codeblock_text_style: Style,
    pub md_codeblock_bg: Option<Color>,
    pub md_link_style: Style,
    pub md_quote_style: Style,
    pub md_list_marker_style: Style,
    pub md_rule_style: Style,

    // Input area
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,
    pub input_cursor_style: Style,
    pub input_disabled_style: Style,
    pub alert_border_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Rgb(15, 23, 42),

            title_style: Style::default()
                .fg(Color::Rgb(129, 140, 248))
                .add_modifier(Modifier::BOLD),
            subtitle_style: Style::default().fg(Color::Rgb(148, 163, 184)),
            tagline_style: Style::default().fg(Color::Rgb(100, 116, 139)),
            footer_style: Style::default().fg(Color::Rgb(100, 116, 139)),
            empty_state_title_style: Style::default()
                .fg(Color::Rgb(226, 232, 240))
                .add_modifier(Modifier::BOLD),
            empty_state_text_style: Style::default().fg(Color::Rgb(148, 163, 184)),

            user_label_style: Style::default()
                .fg(Color::Rgb(96, 165, 250))
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Rgb(191, 219, 254)),
            model_label_style: Style::default()
                .fg(Color::Rgb(129, 140, 248))
                .add_modifier(Modifier::BOLD),
            model_text_style: Style::default().fg(Color::Rgb(226, 232, 240)),
            error_text_style: Style::default().fg(Color::Rgb(248, 113, 113)),
            timestamp_style: Style::default().fg(Color::Rgb(100, 116, 139)),
            attachment_style: Style::default()
                .fg(Color::Rgb(125, 211, 252))
                .add_modifier(Modifier::ITALIC),
            loading_style: Style::default().fg(Color::Rgb(148, 163, 184)),

            md_heading_style: Style::default()
                .fg(Color::Rgb(165, 180, 252))
                .add_modifier(Modifier::BOLD),
            md_inline_code_style: Style::default()
                .fg(Color::Rgb(251, 191, 36))
                .bg(Color::Rgb(30, 41, 59)),
            md_codeblock_text_style: Style::default().fg(Color::Rgb(241, 245, 249)),
            md_codeblock_bg: Some(Color::Rgb(30, 41, 59)),
            md_link_style: Style::default()
                .fg(Color::Rgb(96, 165, 250))
                .add_modifier(Modifier::UNDERLINED),
            md_quote_style: Style::default()
                .fg(Color::Rgb(148, 163, 184))
                .add_modifier(Modifier::ITALIC),
            md_list_marker_style: Style::default().fg(Color::Rgb(129, 140, 248)),
            md_rule_style: Style::default().fg(Color::Rgb(71, 85, 105)),

            input_border_style: Style::default().fg(Color::Rgb(96, 165, 250)),
            input_title_style: Style::default().fg(Color::Rgb(148, 163, 184)),
            input_text_style: Style::default().fg(Color::Rgb(241, 245, 249)),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            input_disabled_style: Style::default().fg(Color::Rgb(71, 85, 105)),
            alert_border_style: Style::default().fg(Color::Rgb(248, 113, 113)),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::Rgb(248, 250, 252),

            title_style: Style::default()
                .fg(Color::Rgb(30, 41, 59))
                .add_modifier(Modifier::BOLD),
            subtitle_style: Style::default().fg(Color::Rgb(100, 116, 139)),
            tagline_style: Style::default().fg(Color::Rgb(71, 85, 105)),
            footer_style: Style::default().fg(Color::Rgb(148, 163, 184)),
            empty_state_title_style: Style::default()
                .fg(Color::Rgb(30, 41, 59))
                .add_modifier(Modifier::BOLD),
            empty_state_text_style: Style::default().fg(Color::Rgb(100, 116, 139)),

            user_label_style: Style::default()
                .fg(Color::Rgb(37, 99, 235))
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Rgb(30, 64, 175)),
            model_label_style: Style::default()
                .fg(Color::Rgb(79, 70, 229))
                .add_modifier(Modifier::BOLD),
            model_text_style: Style::default().fg(Color::Rgb(51, 65, 85)),
            error_text_style: Style::default().fg(Color::Rgb(153, 27, 27)),
            timestamp_style: Style::default().fg(Color::Rgb(148, 163, 184)),
            attachment_style: Style::default()
                .fg(Color::Rgb(2, 132, 199))
                .add_modifier(Modifier::ITALIC),
            loading_style: Style::default().fg(Color::Rgb(148, 163, 184)),

            md_heading_style: Style::default()
                .fg(Color::Rgb(67, 56, 202))
                .add_modifier(Modifier::BOLD),
            md_inline_code_style: Style::default()
                .fg(Color::Rgb(30, 41, 59))
                .bg(Color::Rgb(226, 232, 240)),
            md_codeblock_text_style: Style::default().fg(Color::Rgb(241, 245, 249)),
            md_codeblock_bg: Some(Color::Rgb(30, 41, 59)),
            md_link_style: Style::default()
                .fg(Color::Rgb(37, 99, 235))
                .add_modifier(Modifier::UNDERLINED),
            md_quote_style: Style::default()
                .fg(Color::Rgb(100, 116, 139))
                .add_modifier(Modifier::ITALIC),
            md_list_marker_style: Style::default().fg(Color::Rgb(79, 70, 229)),
            md_rule_style: Style::default().fg(Color::Rgb(203, 213, 225)),

            input_border_style: Style::default().fg(Color::Rgb(59, 130, 246)),
            input_title_style: Style::default().fg(Color::Rgb(100, 116, 139)),
            input_text_style: Style::default().fg(Color::Rgb(30, 41, 59)),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            input_disabled_style: Style::default().fg(Color::Rgb(203, 213, 225)),
            alert_border_style: Style::default().fg(Color::Rgb(220, 38, 38)),
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "light" => Self::light(),
            // Fallback
            _ => Self::dark_default(),
        }
    }

    pub fn md_codeblock_bg_color(&self) -> Option<Color> {
        self.md_codeblock_bg
    }

    pub fn base_style(&self) -> Style {
        Style::default().bg(self.background_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_is_case_insensitive_with_dark_fallback() {
        assert_eq!(
            Theme::from_name("LIGHT").background_color,
            Theme::light().background_color
        );
        assert_eq!(
            Theme::from_name("solarized").background_color,
            Theme::dark_default().background_color
        );
    }
}
