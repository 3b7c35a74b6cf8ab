// Library exports for shipdash

pub mod aggregate;
pub mod charts;
pub mod data;
pub mod error;
pub mod graph;
pub mod page;
pub mod palette;
pub mod runtime;

pub use error::DashboardError;
pub use runtime::{build_dashboard, DashboardConfig, DashboardSummary};

/// Raster size of every chart image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
        }
    }
}
