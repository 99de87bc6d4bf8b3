pub mod homepage_controller;

pub use homepage_controller::HomepageController;
