// Presentation layer - 1-bit frames and the layouts drawn into them
pub mod composer;
pub mod draw;
pub mod fonts;
pub mod frame;
pub mod icons;
pub mod layouts;
pub mod text;
