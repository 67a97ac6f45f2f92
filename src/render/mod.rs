/// Rendering layer: one PNG chart per variable, plus the HTML index and
/// optional CSV export placed next to the images.
pub mod chart;
pub mod report;
