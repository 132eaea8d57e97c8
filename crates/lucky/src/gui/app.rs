use crate::config::{self, Config};
use crate::deck::{Deck, Scene, Stage, TimerId};
use crate::events::AppEvent;
use crate::gui::host::{AreaViewport, GlibScheduler};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::{view, window};
use cardkit::geom::Point;
use cardkit::prize::PrizePool;
use gdk_pixbuf::Pixbuf;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

// frame gaps longer than this (window hidden, debugger) are not simulated
const MAX_FRAME_GAP_MICROS: i64 = 100_000;

pub type GuiScene = Scene<GlibScheduler, AreaViewport>;

pub struct AppModel {
    pub scene: Rc<RefCell<GuiScene>>,
    pub logo: Rc<RefCell<Option<Pixbuf>>>,
    pub title: String,
    pub visible: bool,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Show,
    Hide,
    Spread,
    Reset,
    Activate,
    Click(Point),
    CursorMove(Point),
    CursorLeave,
    Resize,
    Timer(TimerId),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Show => AppMsg::Show,
            AppEvent::Hide => AppMsg::Hide,
            AppEvent::Spread => AppMsg::Spread,
            AppEvent::Reset => AppMsg::Reset,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

impl AppModel {
    fn stage(&self) -> Stage {
        Stage::new(
            self.drawing_area.width() as f64,
            self.drawing_area.height() as f64,
        )
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            #[watch]
            set_title: Some(&model.title),
            #[watch]
            set_visible: model.visible,
            add_css_class: "lucky-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match key {
                        gtk::gdk::Key::Escape => sender.input(AppMsg::Hide),
                        gtk::gdk::Key::Return | gtk::gdk::Key::KP_Enter | gtk::gdk::Key::space => {
                            sender.input(AppMsg::Activate)
                        }
                        gtk::gdk::Key::r => sender.input(AppMsg::Reset),
                        _ => return glib::Propagation::Proceed,
                    }
                    glib::Propagation::Stop
                }
            },

            #[local_ref]
            drawing_area -> gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                set_focusable: true,
                add_css_class: "lucky-stage",

                add_controller = gtk::EventControllerMotion {
                    connect_motion[sender] => move |_, x, y| {
                        sender.input(AppMsg::CursorMove(Point::new(x, y)));
                    },
                    connect_leave[sender] => move |_| {
                        sender.input(AppMsg::CursorLeave);
                    }
                },

                add_controller = gtk::GestureClick {
                    set_button: gtk::gdk::BUTTON_PRIMARY,
                    connect_released[sender] => move |_, _, x, y| {
                        sender.input(AppMsg::Click(Point::new(x, y)));
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();
        window::apply_config(&root, &config);

        let area = gtk::DrawingArea::default();
        let deck = Deck::mount(
            PrizePool::new(&config.prizes),
            GlibScheduler::new(sender.clone()),
            AreaViewport::new(area.clone(), sender.clone()),
        );
        let scene = Scene::new(deck, config.title.clone());

        let model = AppModel {
            scene: Rc::new(RefCell::new(scene)),
            logo: Rc::new(RefCell::new(view::load_logo(config.logo.as_deref()))),
            title: config.title,
            visible: true,
            root: root.clone(),
            drawing_area: area,
        };

        let drawing_area = &model.drawing_area;
        let widgets = view_output!();

        let scene_draw = model.scene.clone();
        let logo_draw = model.logo.clone();
        model
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, height| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                let stage = Stage::new(width as f64, height as f64);
                let logo = logo_draw.borrow();
                let scene = scene_draw.borrow();
                if let Err(e) = view::draw(cr, &scene, logo.as_ref(), &colors, stage) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let scene_tick = model.scene.clone();
        let last_frame = Cell::new(None::<i64>);
        let was_moving = Cell::new(false);
        model
            .drawing_area
            .add_tick_callback(move |drawing_area, clock| {
                let now = clock.frame_time();
                let dt = last_frame
                    .replace(Some(now))
                    .map(|prev| (now - prev).clamp(0, MAX_FRAME_GAP_MICROS))
                    .map_or(Duration::ZERO, |micros| Duration::from_micros(micros as u64));

                let mut scene = scene_tick.borrow_mut();
                if scene.is_at_rest() && !was_moving.get() {
                    return glib::ControlFlow::Continue;
                }
                let moving = scene.tick(dt);
                // one more frame after settling so the final pose is drawn
                if moving || was_moving.replace(moving) {
                    drawing_area.queue_draw();
                }
                glib::ControlFlow::Continue
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        let stage = self.stage();
        let mut scene = self.scene.borrow_mut();

        let redraw = match msg {
            AppMsg::Show => {
                self.visible = true;
                window::raise(&self.root);
                true
            }
            AppMsg::Hide => {
                self.visible = false;
                scene.pointer_leave();
                false
            }
            AppMsg::Spread => scene.apply(|deck| deck.spread()),
            AppMsg::Reset => scene.apply(|deck| deck.reset()),
            AppMsg::Activate => scene.activate(),
            AppMsg::Click(point) => {
                let changed = scene.click(stage, point);
                // the card under the pointer may have changed role
                scene.pointer_move(stage, point) || changed
            }
            AppMsg::CursorMove(point) => {
                let changed = scene.pointer_move(stage, point);
                self.drawing_area.set_tooltip_text(scene.tooltip());
                changed
            }
            AppMsg::CursorLeave => scene.pointer_leave(),
            AppMsg::Resize => scene.apply(|deck| deck.on_resize()),
            AppMsg::Timer(timer) => scene.apply(|deck| deck.on_timer(timer)),
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.logo.replace(view::load_logo(new_config.logo.as_deref()));
                    scene.title = new_config.title.clone();
                    self.title = new_config.title;
                    scene.reload_prizes(&new_config.prizes);
                    log::info!("Configuration reloaded");
                    true
                }
                Err(e) => {
                    log::error!("Failed to reload config: {}", e);
                    false
                }
            },
        };

        if redraw {
            self.drawing_area.queue_draw();
        }
    }

    fn shutdown(&mut self, _widgets: &mut Self::Widgets, _output: relm4::Sender<Self::Output>) {
        self.scene.borrow_mut().deck.unmount();
    }
}
