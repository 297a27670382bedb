// Food predictions: save, classify uploads, and history.

pub mod handlers;
pub mod service;
pub mod summary;
