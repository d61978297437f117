use std::time::Instant;

use chrono::{DateTime, Local};

use crate::connectivity::{Connectivity, Swatch};
use crate::feed::FeedMonitor;
use crate::widgets::badge::{Badge, Fade};
use crate::widgets::header::{CRUMBS, StatusHeader};

/// The last time the displayed connectivity flipped.
#[derive(Debug, Clone, Copy)]
struct Flip {
    from: Swatch,
    at: Instant,
    wall: DateTime<Local>,
}

pub struct App {
    feed: FeedMonitor,
    crumbs: Vec<String>,
    connectivity: Connectivity,
    last_flip: Option<Flip>,
    show_help: bool,
    on_notifications_click: Box<dyn FnMut() + Send>,
    message: Option<String>,
}

impl App {
    /// The initial state is whatever the feed reports right now.
    pub fn new(feed: FeedMonitor) -> Self {
        let connectivity = feed.latest();
        Self {
            feed,
            crumbs: CRUMBS.iter().map(|c| c.to_string()).collect(),
            connectivity,
            last_flip: None,
            show_help: false,
            on_notifications_click: Box::new(|| {}),
            message: None,
        }
    }

    /// Called when the bell is activated. Defaults to doing nothing.
    pub fn on_notifications_click(&mut self, callback: impl FnMut() + Send + 'static) {
        self.on_notifications_click = Box::new(callback);
    }

    pub fn notifications_clicked(&mut self) {
        tracing::debug!("notifications activated");
        (self.on_notifications_click)();
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    pub fn tick(&mut self) {
        self.sync(Instant::now());
    }

    /// Adopt the feed's latest flag. Values published between two syncs
    /// are never seen individually.
    fn sync(&mut self, now: Instant) -> bool {
        let next = self.feed.latest();
        if next == self.connectivity {
            return false;
        }

        tracing::info!(
            from = ?self.connectivity,
            to = ?next,
            source = self.feed.source(),
            "feed connectivity changed"
        );
        self.last_flip = Some(Flip {
            from: self.displayed_swatch(now),
            at: now,
            wall: Local::now(),
        });
        self.connectivity = next;
        true
    }

    pub fn fade(&self, now: Instant) -> Option<Fade> {
        let flip = self.last_flip?;
        Fade::since(flip.from, now.saturating_duration_since(flip.at))
    }

    pub fn is_fading(&self, now: Instant) -> bool {
        self.fade(now).is_some()
    }

    fn displayed_swatch(&self, now: Instant) -> Swatch {
        Badge::new(self.connectivity).fade(self.fade(now)).swatch()
    }

    /// Header for this frame. Attach [`App::crumbs`] before rendering.
    pub fn header(&self, now: Instant) -> StatusHeader<'static> {
        StatusHeader::new(self.connectivity).fade(self.fade(now))
    }

    pub fn crumbs(&self) -> Vec<&str> {
        self.crumbs.iter().map(String::as_str).collect()
    }

    /// Replace the breadcrumb trail. An empty trail keeps the current one.
    pub fn set_crumbs(&mut self, crumbs: Vec<String>) {
        if crumbs.is_empty() {
            return;
        }
        tracing::debug!(?crumbs, "breadcrumb changed");
        self.crumbs = crumbs;
    }

    pub fn last_change(&self) -> Option<DateTime<Local>> {
        self.last_flip.map(|flip| flip.wall)
    }

    pub fn feed_source(&self) -> &str {
        self.feed.source()
    }

    pub fn is_manual(&self) -> bool {
        self.feed.is_manual()
    }

    /// Flip a manual feed. Probed feeds cannot be overridden.
    pub fn toggle_connectivity(&mut self) {
        let next = self.feed.latest().toggled();
        if self.feed.set(next.is_live()) {
            self.clear_message();
        } else {
            self.set_message("feed is probed; toggling needs manual mode".to_string());
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_message(&mut self, msg: String) {
        self.message = Some(msg);
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub async fn shutdown(self) {
        self.feed.shutdown().await;
    }
}
