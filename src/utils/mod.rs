pub mod format;
pub mod sync;
