use crate::config::Config;
use gtk::prelude::*;
use gtk4 as gtk;

pub fn apply_config(window: &gtk::ApplicationWindow, config: &Config) {
    window.set_title(Some(&config.title));
    window.set_default_size(config.window.width, config.window.height);
}

/// Brings the window back to the front when shown from the control socket.
pub fn raise(window: &gtk::ApplicationWindow) {
    window.set_visible(true);
    window.present();
}
