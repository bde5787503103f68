use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use streamdeck_lib::Context;

const KEY_PX: u32 = 144;

// Leave a small margin inside the 144px key.
const MAX_TEXT_WIDTH: f32 = 136.0;

// Advance width of a monospace glyph relative to the font size.
const GLYPH_ASPECT: f32 = 0.6;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    fn foreground(self) -> &'static str {
        match self {
            Theme::Dark => "#fff",
            Theme::Light => "#000",
        }
    }
}

/// Render an integer value as a self-contained SVG data URL.
///
/// The font size scales down automatically for long numbers so they always
/// fit. Same value and theme always give the same payload.
pub fn render_number(value: i64, theme: Theme) -> String {
    let text = value.to_string();
    let svg = centered_text_svg(&text, theme);
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

/// Push a rendered payload onto a key.
pub fn show_image(cx: &Context, ctx_id: &str, data_url: String) {
    cx.sd().set_image(ctx_id, Some(data_url), None, None);
}

fn font_size_for(text: &str) -> f32 {
    // Try font sizes from largest to smallest until the text fits in one line.
    let sizes = [56.0_f32, 44.0, 36.0, 28.0, 20.0];
    let chars = text.chars().count() as f32;
    sizes
        .iter()
        .copied()
        .find(|&size| chars * size * GLYPH_ASPECT <= MAX_TEXT_WIDTH)
        .unwrap_or(20.0)
}

fn centered_text_svg(text: &str, theme: Theme) -> String {
    let size = font_size_for(text);
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{px}" height="{px}" viewBox="0 0 {px} {px}">"#,
            r#"<text x="50%" y="50%" fill="{fill}" font-size="{size}" font-family="monospace" "#,
            r#"text-anchor="middle" dominant-baseline="central">{text}</text></svg>"#
        ),
        px = KEY_PX,
        fill = theme.foreground(),
        size = size,
        text = text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(payload: &str) -> String {
        let b64 = payload.strip_prefix("data:image/svg+xml;base64,").unwrap();
        String::from_utf8(STANDARD.decode(b64).unwrap()).unwrap()
    }

    #[test]
    fn render_is_deterministic() {
        assert_eq!(render_number(42, Theme::Dark), render_number(42, Theme::Dark));
        assert_ne!(render_number(42, Theme::Dark), render_number(42, Theme::Light));
        assert_ne!(render_number(42, Theme::Dark), render_number(43, Theme::Dark));
    }

    #[test]
    fn payload_encodes_text_and_colour() {
        let dark = decode(&render_number(-17, Theme::Dark));
        assert!(dark.contains(">-17</text>"));
        assert!(dark.contains(r##"fill="#fff""##));

        let light = decode(&render_number(5, Theme::Light));
        assert!(light.contains(r##"fill="#000""##));
    }

    #[test]
    fn long_numbers_shrink() {
        assert_eq!(font_size_for("7"), 56.0);
        assert!(font_size_for("1234567890") < font_size_for("12"));
        assert_eq!(font_size_for(&i64::MIN.to_string()), 20.0);
    }
}
