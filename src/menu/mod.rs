pub mod button;
pub mod coordinator;
pub mod feedback;
pub mod geometry;
pub mod items;
pub mod overlay;
pub mod panel;
