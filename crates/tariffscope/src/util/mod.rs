pub mod format;
pub mod styles;
