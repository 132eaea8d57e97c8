pub mod app;
pub mod host;
pub mod theme;
pub mod view;
pub mod window;
