use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colors using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<[u8; 3]> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            [
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            ]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Scalar colormap: normalized value → RGB
// ---------------------------------------------------------------------------

/// Maps normalized values in [0, 1] onto a hue ramp (blue → red).
#[derive(Debug, Clone)]
pub struct Colormap {
    stops: Vec<[u8; 3]>,
}

impl Colormap {
    /// Build a hue-ramp colormap with `n` stops.
    pub fn new(n: usize) -> Colormap {
        // Sweep hues from blue (240°) down to red (0°).
        let stops = (0..n.max(2))
            .map(|i| {
                let hue = 240.0 * (1.0 - i as f32 / (n.max(2) - 1) as f32);
                let hsl = Hsl::new(hue, 0.85, 0.5);
                let rgb: Srgb = hsl.into_color();
                [
                    (rgb.red * 255.0) as u8,
                    (rgb.green * 255.0) as u8,
                    (rgb.blue * 255.0) as u8,
                ]
            })
            .collect();
        Colormap { stops }
    }

    /// Look up the color for a normalized value (clamped to [0, 1]).
    pub fn color_for(&self, value: f64) -> [u8; 3] {
        let v = value.clamp(0.0, 1.0);
        let i = (v * (self.stops.len() - 1) as f64).round() as usize;
        self.stops[i]
    }
}

impl Default for Colormap {
    fn default() -> Colormap {
        Colormap::new(256)
    }
}
