pub mod layout;
pub mod scene;

pub use layout::{DiagramLayout, LayoutCache, Point};
pub use scene::{EdgeSprite, NodeSprite, Scene};
