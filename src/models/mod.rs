pub mod dashboard;
pub mod event;
pub mod idea;
pub mod profile;
