//! Deck host seams backed by the glib main loop.

use super::app::{AppModel, AppMsg};
use crate::deck::{Scheduler, SubscriptionId, TimerId, Viewport};
use cardkit::metrics::INITIAL_VIEWPORT_WIDTH;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::ComponentSender;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// One-shot glib timeouts that report back as [`AppMsg::Timer`].
pub struct GlibScheduler {
    sender: ComponentSender<AppModel>,
    sources: Rc<RefCell<HashMap<TimerId, glib::SourceId>>>,
}

impl GlibScheduler {
    pub fn new(sender: ComponentSender<AppModel>) -> Self {
        Self {
            sender,
            sources: Rc::default(),
        }
    }
}

impl Scheduler for GlibScheduler {
    fn schedule(&mut self, delay: Duration, timer: TimerId) {
        let sources = self.sources.clone();
        let sender = self.sender.clone();
        let source = glib::timeout_add_local_once(delay, move || {
            // a fired source must not be removed again
            sources.borrow_mut().remove(&timer);
            sender.input(AppMsg::Timer(timer));
        });
        self.sources.borrow_mut().insert(timer, source);
    }

    fn cancel(&mut self, timer: TimerId) {
        if let Some(source) = self.sources.borrow_mut().remove(&timer) {
            source.remove();
        }
    }
}

/// The drawing area stands in for the viewport; its allocation is the width
/// the layout is computed from.
pub struct AreaViewport {
    area: gtk::DrawingArea,
    sender: ComponentSender<AppModel>,
    handlers: HashMap<SubscriptionId, glib::SignalHandlerId>,
    next: u64,
}

impl AreaViewport {
    pub fn new(area: gtk::DrawingArea, sender: ComponentSender<AppModel>) -> Self {
        Self {
            area,
            sender,
            handlers: HashMap::new(),
            next: 0,
        }
    }
}

impl Viewport for AreaViewport {
    /// Falls back to the initial width until the area is allocated.
    fn width(&self) -> f64 {
        match self.area.width() {
            w if w > 0 => w as f64,
            _ => INITIAL_VIEWPORT_WIDTH,
        }
    }

    fn subscribe(&mut self) -> SubscriptionId {
        self.next += 1;
        let id = SubscriptionId::from(self.next);
        let sender = self.sender.clone();
        let handler = self.area.connect_resize(move |_, _, _| {
            sender.input(AppMsg::Resize);
        });
        self.handlers.insert(id, handler);
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        if let Some(handler) = self.handlers.remove(&id) {
            self.area.disconnect(handler);
        }
    }
}
