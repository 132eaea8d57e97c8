use lucky::config;
use lucky::gui::app::AppModel;
use lucky::sys::runtime;
use relm4::prelude::*;

fn main() {
    env_logger::init();

    match config::write_default_config() {
        Ok(path) => log::debug!("Config at {}", path.display()),
        Err(e) => log::warn!("Could not write default config: {}", e),
    }
    let config = config::load_or_default();

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.devsmith.lucky");

    app.run::<AppModel>((config, rx));
}
