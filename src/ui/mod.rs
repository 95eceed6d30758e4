pub mod panels;
pub mod peak_dialog;
pub mod tabs;
