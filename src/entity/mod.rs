//! SeaORM entity definitions.

pub mod area;
pub mod machine;
pub mod oem;
pub mod part;
pub mod user;
