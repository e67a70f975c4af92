use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Continuous colour scales
// ---------------------------------------------------------------------------

/// Colour scale used to shade scatter points by property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScale {
    Viridis,
    Plasma,
}

const VIRIDIS: [[u8; 3]; 9] = [
    [0x44, 0x01, 0x54],
    [0x47, 0x2d, 0x7b],
    [0x3b, 0x52, 0x8b],
    [0x2c, 0x72, 0x8e],
    [0x21, 0x91, 0x8c],
    [0x28, 0xae, 0x80],
    [0x5e, 0xc9, 0x62],
    [0xad, 0xdc, 0x30],
    [0xfd, 0xe7, 0x25],
];

const PLASMA: [[u8; 3]; 9] = [
    [0x0d, 0x08, 0x87],
    [0x4c, 0x02, 0xa1],
    [0x7e, 0x03, 0xa8],
    [0xa9, 0x23, 0x95],
    [0xcc, 0x47, 0x78],
    [0xe5, 0x6b, 0x5d],
    [0xf8, 0x94, 0x41],
    [0xfd, 0xc3, 0x28],
    [0xf0, 0xf9, 0x21],
];

impl ColorScale {
    fn stops(self) -> &'static [[u8; 3]] {
        match self {
            ColorScale::Viridis => &VIRIDIS,
            ColorScale::Plasma => &PLASMA,
        }
    }

    /// Colour at `t` in `[0, 1]` (clamped), interpolated in linear RGB.
    pub fn color_at(self, t: f64) -> Color32 {
        let stops = self.stops();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let pos = t * (stops.len() - 1) as f64;
        let i = (pos.floor() as usize).min(stops.len() - 2);
        let frac = (pos - i as f64) as f32;

        let a = to_linear(stops[i]);
        let b = to_linear(stops[i + 1]);
        let rgb: Srgb<u8> = Srgb::from_linear(a.mix(b, frac));
        Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
    }
}

fn to_linear([r, g, b]: [u8; 3]) -> LinSrgb {
    Srgb::new(r, g, b).into_linear()
}

// ---------------------------------------------------------------------------
// Value → colour mapping over an observed range
// ---------------------------------------------------------------------------

/// Maps property values to colours over `[min, max]`.
#[derive(Debug, Clone, Copy)]
pub struct ColorMap {
    scale: ColorScale,
    min: f64,
    max: f64,
}

impl ColorMap {
    pub fn new(scale: ColorScale, (min, max): (f64, f64)) -> Self {
        ColorMap { scale, min, max }
    }

    /// Position of a value in the range, `0.0` for a degenerate range.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON {
            0.0
        } else {
            (value - self.min) / span
        }
    }

    /// Split the range into `n` equal buckets and return each bucket's
    /// colour, used to draw points in a few batches instead of one by one.
    pub fn bucket_colors(&self, n: usize) -> Vec<Color32> {
        (0..n)
            .map(|i| {
                let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
                self.scale.color_at(t)
            })
            .collect()
    }

    /// Bucket index of a value for [`ColorMap::bucket_colors`].
    pub fn bucket(&self, value: f64, n: usize) -> usize {
        let t = self.normalize(value).clamp(0.0, 1.0);
        ((t * n as f64) as usize).min(n.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_match_stops() {
        assert_eq!(
            ColorScale::Viridis.color_at(0.0),
            Color32::from_rgb(0x44, 0x01, 0x54)
        );
        assert_eq!(
            ColorScale::Plasma.color_at(1.0),
            Color32::from_rgb(0xf0, 0xf9, 0x21)
        );
        assert_eq!(
            ColorScale::Plasma.color_at(7.0),
            ColorScale::Plasma.color_at(1.0)
        );
    }

    #[test]
    fn degenerate_range_maps_to_start() {
        let cm = ColorMap::new(ColorScale::Viridis, (5.0, 5.0));
        assert_eq!(cm.normalize(5.0), 0.0);
        assert_eq!(cm.bucket(5.0, 16), 0);
    }

    #[test]
    fn buckets_cover_range() {
        let cm = ColorMap::new(ColorScale::Plasma, (0.0, 100.0));
        assert_eq!(cm.bucket(0.0, 16), 0);
        assert_eq!(cm.bucket(100.0, 16), 15);
        assert_eq!(cm.bucket(50.0, 16), 8);
        assert_eq!(cm.bucket_colors(16).len(), 16);
    }

    #[test]
    fn scale_names_deserialize_lowercase() {
        #[derive(Deserialize)]
        struct Wrap {
            scale: ColorScale,
        }
        let w: Wrap = toml::from_str("scale = \"plasma\"").unwrap();
        assert_eq!(w.scale, ColorScale::Plasma);
    }
}
