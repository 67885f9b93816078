pub mod catalog_menu;
pub mod editor_pane;
pub mod instructions_panel;
pub mod level_picker;
pub mod level_progress;
pub mod module_complete;
pub mod results_panel;
pub mod storyline;
pub mod success_notice;
