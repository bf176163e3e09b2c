pub mod concentration;
pub mod formula;
pub mod pixel;
pub mod raster;
pub mod statistics;
pub mod utils;
