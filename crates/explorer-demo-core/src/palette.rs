//! Default query colors.
//!
//! Colors are handed out by descriptor position from a fixed 20-entry
//! categorical palette. Positions past the end fall back to the first entry
//! rather than cycling, so the 21st query shares the first query's color.

/// Number of distinct default colors.
pub const MAX_COLORS: usize = 20;

/// The categorical palette, in assignment order.
pub const PALETTE: [&str; MAX_COLORS] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896",
    "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7",
    "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

/// Default color for the descriptor at `index`.
#[must_use]
pub fn default_color(index: usize) -> &'static str {
    PALETTE.get(index).copied().unwrap_or(PALETTE[0])
}
