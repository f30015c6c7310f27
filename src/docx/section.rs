//! Section properties: page geometry and margins.

/// Twips per inch (twentieth of a point, 1440 = 1 inch).
pub const TWIPS_PER_INCH: f64 = 1440.0;

/// Page geometry for a contiguous range of blocks.
///
/// Stored in twips internally; every external surface speaks inches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Page width in twips
    pub page_width: u32,
    /// Page height in twips
    pub page_height: u32,
    /// Top margin in twips
    pub margin_top: u32,
    /// Bottom margin in twips
    pub margin_bottom: u32,
    /// Left margin in twips
    pub margin_left: u32,
    /// Right margin in twips
    pub margin_right: u32,
}

impl Default for Section {
    fn default() -> Self {
        // US Letter: 8.5" x 11" with 1" margins
        Self {
            page_width: 12240,
            page_height: 15840,
            margin_top: 1440,
            margin_bottom: 1440,
            margin_left: 1440,
            margin_right: 1440,
        }
    }
}

/// Convert twips to inches.
pub fn twips_to_inches(twips: u32) -> f64 {
    twips as f64 / TWIPS_PER_INCH
}

/// Convert inches to twips.
pub fn inches_to_twips(inches: f64) -> u32 {
    (inches * TWIPS_PER_INCH) as u32
}

impl Section {
    /// Page width in inches.
    pub fn page_width_inches(&self) -> f64 {
        twips_to_inches(self.page_width)
    }

    /// Page height in inches.
    pub fn page_height_inches(&self) -> f64 {
        twips_to_inches(self.page_height)
    }

    /// Set margins from inches; `None` leaves the margin as-is.
    pub fn merge_margins_inches(
        &mut self,
        left: Option<f64>,
        right: Option<f64>,
        top: Option<f64>,
        bottom: Option<f64>,
    ) {
        if let Some(v) = left {
            self.margin_left = inches_to_twips(v);
        }
        if let Some(v) = right {
            self.margin_right = inches_to_twips(v);
        }
        if let Some(v) = top {
            self.margin_top = inches_to_twips(v);
        }
        if let Some(v) = bottom {
            self.margin_bottom = inches_to_twips(v);
        }
    }
}
