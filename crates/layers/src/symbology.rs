//! Demand symbology: discrete color tiers and square-root extrusion.

pub type Rgba = [u8; 4];

/// Lower bounds of tiers 1..=5; tier 0 is everything below the first break.
pub const DEMAND_BREAKS: [f64; 5] = [25.0, 75.0, 150.0, 350.0, 750.0];

/// One color per tier, cool to hot, opacity rising with demand.
pub const DEMAND_COLORS: [Rgba; 6] = [
    [67, 150, 185, 210],  // #4396B9
    [120, 224, 205, 210], // #78E0CD
    [224, 253, 188, 215], // #E0FDBC
    [251, 237, 184, 220], // #FBEDB8
    [242, 177, 99, 225],  // #F2B163
    [193, 68, 82, 235],   // #C14452
];

pub const ELEVATION_SCALE: f64 = 35.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OutlineStyle {
    pub color: Rgba,
    pub width_min_px: f64,
}

pub const ZONE_OUTLINE: OutlineStyle = OutlineStyle {
    color: [222, 236, 250, 210],
    width_min_px: 1.8,
};

// Negative and NaN predictions render as zero demand.
fn demand(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.max(0.0) }
}

/// Tier index in `0..DEMAND_COLORS.len()`.
pub fn tier_for(value: f64) -> usize {
    let v = demand(value);
    DEMAND_BREAKS.iter().take_while(|b| v >= **b).count()
}

pub fn color_for(value: f64) -> Rgba {
    DEMAND_COLORS[tier_for(value)]
}

pub fn elevation_for(value: f64) -> f64 {
    demand(value).sqrt() * ELEVATION_SCALE
}
