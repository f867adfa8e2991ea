pub mod encode;
pub mod raster;
pub mod text_anim;
pub mod text_grid;
