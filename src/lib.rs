pub mod body;
pub mod config;
pub mod joint;
pub mod pipeline;
pub mod protocol;
pub mod render;
pub mod rotation;
pub mod selector;
pub mod sensor;
