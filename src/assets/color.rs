use serde::{Deserialize, Serialize};

/// Opaque sRGB color used for watermark text and logo tinting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Opaque black, the fallback tint for malformed hex input.
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Parse a `#RRGGBB` hex string (leading `#` optional, case-insensitive).
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> Result<u8, String> {
            u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
        }

        if s.len() != 6 || !s.is_char_boundary(2) || !s.is_char_boundary(4) {
            return Err("hex color must be #RRGGBB (case-insensitive)".to_owned());
        }

        Ok(Rgb {
            r: hex_byte(&s[0..2])?,
            g: hex_byte(&s[2..4])?,
            b: hex_byte(&s[4..6])?,
        })
    }

    /// Parse leniently: malformed input falls back to black.
    ///
    /// The logo tint contract treats bad hex as `#000000` rather than an
    /// error, so a stray config value degrades to a dark silhouette instead
    /// of failing the render.
    pub fn parse_or_black(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::BLACK)
    }

    /// Format as a `#rrggbb` string for SVG attributes.
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Rgb::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_hex_rgb() {
        let c: Rgb = serde_json::from_value(json!("#ff0000")).unwrap();
        assert_eq!(c, Rgb { r: 255, g: 0, b: 0 });

        let c: Rgb = serde_json::from_value(json!("00FF7f")).unwrap();
        assert_eq!(c, Rgb { r: 0, g: 255, b: 127 });
    }

    #[test]
    fn rejects_malformed_hex_in_config() {
        assert!(serde_json::from_value::<Rgb>(json!("#12345")).is_err());
        assert!(serde_json::from_value::<Rgb>(json!("#zzzzzz")).is_err());
    }

    #[test]
    fn lenient_parse_falls_back_to_black() {
        assert_eq!(Rgb::parse_or_black("#FF0000"), Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(Rgb::parse_or_black("not-a-color"), Rgb::BLACK);
        assert_eq!(Rgb::parse_or_black(""), Rgb::BLACK);
    }

    #[test]
    fn css_round_trip() {
        let c = Rgb { r: 18, g: 52, b: 86 };
        assert_eq!(c.to_css(), "#123456");
        assert_eq!(Rgb::parse(&c.to_css()).unwrap(), c);
    }
}
