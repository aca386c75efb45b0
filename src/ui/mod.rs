pub mod render;
pub mod screen;
pub mod styles;

pub use render::TermSurface;
