pub mod fallback;
pub mod prompt;
