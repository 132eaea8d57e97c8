use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub backdrop: Srgba<f64>,
    pub title: Srgba<f64>,
    pub card_face: Srgba<f64>,
    pub card_face_shade: Srgba<f64>,
    pub card_border: Srgba<f64>,
    pub card_text: Srgba<f64>,
    pub prize_face: Srgba<f64>,
    pub prize_face_shade: Srgba<f64>,
    pub prize_text: Srgba<f64>,
    pub accent: Srgba<f64>,
    pub accent_hovered: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            backdrop: Self::lookup_color(
                context,
                "theme_bg_color",
                Srgba::new(0.04, 0.06, 0.12, 1.0),
                None,
            ),
            title: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.95, 0.96, 0.98, 1.0),
                None,
            ),
            card_face: Srgba::new(0.12, 0.16, 0.23, 1.0),
            card_face_shade: Srgba::new(0.06, 0.09, 0.16, 1.0),
            card_border: Srgba::new(0.99, 0.83, 0.30, 0.85),
            card_text: Srgba::new(0.89, 0.91, 0.94, 0.9),
            prize_face: Srgba::new(0.99, 0.90, 0.54, 1.0),
            prize_face_shade: Srgba::new(0.96, 0.62, 0.04, 1.0),
            prize_text: Srgba::new(0.27, 0.15, 0.02, 1.0),
            accent: Self::lookup_color(
                context,
                "accent_bg_color",
                Srgba::new(0.23, 0.51, 0.96, 0.9),
                Some(0.9),
            ),
            accent_hovered: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(0.38, 0.65, 0.98, 1.0),
                Some(1.0),
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.lucky-stage {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
