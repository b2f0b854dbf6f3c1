pub mod assistant_panel;
pub mod properties;
pub mod scene_tree;
pub mod status_bar;
pub mod toolbar;
