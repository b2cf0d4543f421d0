pub mod loading_dialog;
pub mod shape_loading;
pub mod status_bar;
