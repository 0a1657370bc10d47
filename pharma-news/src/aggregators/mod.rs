pub mod therapy_area;

pub use therapy_area::group;
