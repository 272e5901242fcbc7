use std::str::FromStr;

/// A solid RGBA color used by region fills.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FillColor {
    pub rgba: [u8; 4],
}

const NAMED_COLORS: &[(&str, [u8; 4])] = &[
    ("black", [0, 0, 0, 255]),
    ("white", [255, 255, 255, 255]),
    ("red", [255, 0, 0, 255]),
    ("green", [0, 128, 0, 255]),
    ("blue", [0, 0, 255, 255]),
    ("yellow", [255, 255, 0, 255]),
    ("cyan", [0, 255, 255, 255]),
    ("magenta", [255, 0, 255, 255]),
    ("gray", [128, 128, 128, 255]),
];

impl FillColor {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            rgba: [r, g, b, 255],
        }
    }

    /// Rec. 601 luma, integer weights.
    pub fn luma(&self) -> u8 {
        let [r, g, b, _] = self.rgba;
        ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8
    }

    /// Pixel bytes for a store with `channels` interleaved channels.
    ///
    /// 1 = luma, 2 = luma + alpha, 3 = RGB, 4 = RGBA.
    pub fn to_pixel(&self, channels: u8) -> Vec<u8> {
        let [r, g, b, a] = self.rgba;
        match channels {
            1 => vec![self.luma()],
            2 => vec![self.luma(), a],
            3 => vec![r, g, b],
            _ => vec![r, g, b, a],
        }
    }
}

/// Accepts `#rrggbb`, `#rrggbbaa` or a small set of color names.
impl FromStr for FillColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if let Some((_, rgba)) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
            return Ok(Self { rgba: *rgba });
        }

        let hex = lower
            .strip_prefix('#')
            .ok_or_else(|| format!("unknown color '{s}'"))?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(format!("color '{s}' must be #rrggbb or #rrggbbaa"));
        }

        let mut rgba = [255u8; 4];
        for (slot, i) in rgba.iter_mut().zip((0..hex.len()).step_by(2)) {
            *slot = u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| format!("color '{s}' contains invalid hex digits"))?;
        }
        Ok(Self { rgba })
    }
}
