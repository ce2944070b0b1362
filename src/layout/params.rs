//! Geometry constants for the chain layout.

/// Fixed geometry the layout engine works with.
///
/// All lengths are in surface units. The terminal front end maps one unit to one
/// character cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Horizontal distance between consecutive slots.
    pub slot_width: f64,
    /// Vertical distance between blocks sharing a slot.
    pub slot_height: f64,
    /// Vertical step between attestations fanned out under one head cell.
    pub attestation_spacing: f64,
    /// Where the head row sits, as a fraction of viewport height.
    pub head_row_fraction: f64,
    /// Validators per grid row.
    pub validator_columns: usize,
    /// Distance between neighbouring validators in the grid.
    pub validator_spacing: f64,
    /// Where the validator grid starts, as a fraction of viewport height.
    pub validator_band_fraction: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            slot_width: 12.0,
            slot_height: 6.0,
            attestation_spacing: 1.0,
            head_row_fraction: 0.2,
            validator_columns: 32,
            validator_spacing: 2.0,
            validator_band_fraction: 0.75,
        }
    }
}

/// Size of the surface the layout targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in surface units.
    pub width: f64,
    /// Height in surface units.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport. Non-positive dimensions are clamped to one unit.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(120.0, 40.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_clamps_degenerate_sizes() {
        let viewport = Viewport::new(0.0, -3.0);
        assert_eq!(viewport.width, 1.0);
        assert_eq!(viewport.height, 1.0);
    }

    #[test]
    fn default_params_keep_grid_below_head_row() {
        let params = LayoutParams::default();
        assert!(params.validator_band_fraction > params.head_row_fraction);
        assert!(params.validator_columns > 0);
    }
}
