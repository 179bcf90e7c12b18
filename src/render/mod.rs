//! Layout and drawing: record data in, per-page display lists out.

pub mod canvas;
pub mod pages;
pub mod section;
pub mod sections;

pub use canvas::{Canvas, Layer, Mark, Op};
pub use pages::FormPlan;
pub use section::{PaintedSection, SectionLayout};
