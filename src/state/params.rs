/// Custom filter parameters
///
/// These are the four sliders of the "Custom Filters" tool, read by the
/// filter pass when "Apply Filters" is pressed.

/// Slider bounds for brightness, contrast and saturation
pub const PERCENT_RANGE: (i32, i32) = (-100, 100);

/// Slider bounds for the hue shift in degrees
pub const HUE_RANGE: (i32, i32) = (-180, 180);

/// All custom filter parameters
///
/// Every value is an offset: 0 means "leave this channel alone".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterParams {
    /// Brightness offset in percent (-100 to +100)
    /// - -100 = black, 0 = unchanged, +100 = twice as bright
    pub brightness: i32,

    /// Contrast offset in percent (-100 to +100)
    /// - -100 = flat gray, 0 = unchanged
    pub contrast: i32,

    /// Saturation offset in percent (-100 to +100)
    /// - -100 = grayscale, 0 = unchanged
    pub saturation: i32,

    /// Hue rotation in degrees (-180 to +180)
    pub hue: i32,
}

impl FilterParams {
    /// Create parameters, clamping each value to its slider range
    pub fn new(brightness: i32, contrast: i32, saturation: i32, hue: i32) -> Self {
        let pct = |v: i32| v.clamp(PERCENT_RANGE.0, PERCENT_RANGE.1);
        Self {
            brightness: pct(brightness),
            contrast: pct(contrast),
            saturation: pct(saturation),
            hue: hue.clamp(HUE_RANGE.0, HUE_RANGE.1),
        }
    }

    /// Enhancer factor for a percent offset (0 -> 1.0)
    pub fn factor(offset: i32) -> f32 {
        1.0 + offset as f32 / 100.0
    }

    /// Reset all sliders
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
