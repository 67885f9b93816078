pub mod editor;
pub mod level_picker;
pub mod navigation;
pub mod query_editor;
pub mod resize;
