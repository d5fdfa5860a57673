pub mod constants;
pub mod detection;
pub mod entity;
pub mod fields;
pub mod grid;
pub mod guid;
pub mod map;
pub mod movement;
pub mod object_type;
pub mod phasing;
pub mod visibility;
