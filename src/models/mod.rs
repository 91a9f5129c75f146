pub mod attribute;
pub mod group;
pub mod light;
pub mod light_state;
pub mod scene;
