pub mod position;
pub mod vector2d;
