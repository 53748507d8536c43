use std::time::{Duration, Instant};

use crate::collection::GalleryItem;
use crate::config::{SlideshowOptions, Speed};
use crate::events::{Key, KeyOutcome, PointerTarget, SlideFrame, SlideshowCommand};

/// Presentation state for one collection.
///
/// Time is passed in explicitly. The state owns its deadlines (autoplay
/// advance, fullscreen control hide) and the driving task only sleeps until
/// [`SlideshowState::next_deadline`] and calls [`SlideshowState::on_tick`].
#[derive(Debug, Clone)]
pub struct SlideshowState {
    len: usize,
    current: usize,
    playing: bool,
    fullscreen: bool,
    speed: Speed,
    settings_open: bool,
    gallery_open: bool,
    gallery_header_visible: bool,
    controls_visible: bool,
    next_advance_at: Option<Instant>,
    controls_hide_at: Option<Instant>,
    settings_armed_at: Option<Instant>,
    controls_hide_delay: Duration,
    settings_arm_delay: Duration,
    gallery_header_threshold: u32,
}

impl SlideshowState {
    pub fn new(len: usize, options: &SlideshowOptions, now: Instant) -> Self {
        let mut state = Self {
            len,
            current: 0,
            playing: options.autoplay,
            fullscreen: false,
            speed: options.initial_speed,
            settings_open: false,
            gallery_open: false,
            gallery_header_visible: true,
            controls_visible: true,
            next_advance_at: None,
            controls_hide_at: None,
            settings_armed_at: None,
            controls_hide_delay: options.controls_hide_delay,
            settings_arm_delay: options.settings_arm_delay,
            gallery_header_threshold: options.gallery_header_threshold,
        };
        state.reschedule_autoplay(now);
        state
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `None` while there is nothing to show.
    pub fn current(&self) -> Option<usize> {
        (self.len > 0).then_some(self.current)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn is_settings_open(&self) -> bool {
        self.settings_open
    }

    pub fn is_gallery_open(&self) -> bool {
        self.gallery_open
    }

    pub fn is_gallery_header_visible(&self) -> bool {
        self.gallery_header_visible
    }

    /// Whether the fullscreen overlay is shown. An open settings menu pins it.
    pub fn controls_visible(&self) -> bool {
        !self.fullscreen || self.controls_visible || self.settings_open
    }

    pub fn next_advance_at(&self) -> Option<Instant> {
        self.next_advance_at
    }

    /// Earliest moment [`Self::on_tick`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.next_advance_at, self.controls_hide_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Applies one command; returns whether anything visible changed.
    pub fn apply(&mut self, command: SlideshowCommand, now: Instant) -> bool {
        match command {
            SlideshowCommand::Next => self.next(),
            SlideshowCommand::Previous => self.previous(),
            SlideshowCommand::TogglePlay => self.toggle_play(now),
            SlideshowCommand::ToggleFullscreen => self.toggle_fullscreen(now),
            SlideshowCommand::ToggleSettings => self.toggle_settings(now),
            SlideshowCommand::SelectSpeed(speed) => self.select_speed(speed, now),
            SlideshowCommand::PointerDown(target) => self.pointer_down(target, now),
            SlideshowCommand::PointerMoved => self.pointer_moved(now),
            SlideshowCommand::ToggleGallery => self.toggle_gallery(),
            SlideshowCommand::SelectThumbnail(index) => self.select_thumbnail(index, now),
            SlideshowCommand::GalleryScrolled(offset) => self.gallery_scrolled(offset),
            SlideshowCommand::Key(key) => self.handle_key(key, now).changed,
        }
    }

    pub fn handle_key(&mut self, key: Key, now: Instant) -> KeyOutcome {
        let handled = |changed| KeyOutcome {
            handled: true,
            changed,
            prevent_default: false,
        };
        match key {
            Key::ArrowLeft => handled(self.previous()),
            Key::ArrowRight => handled(self.next()),
            Key::Space => KeyOutcome {
                prevent_default: true,
                ..handled(self.toggle_play(now))
            },
            Key::Char('f' | 'F') => handled(self.toggle_fullscreen(now)),
            Key::Escape if self.fullscreen => handled(self.exit_fullscreen()),
            Key::Escape | Key::Char(_) => KeyOutcome::default(),
        }
    }

    pub fn next(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        self.current = (self.current + 1) % self.len;
        self.len > 1
    }

    pub fn previous(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        self.current = (self.current + self.len - 1) % self.len;
        self.len > 1
    }

    pub fn toggle_play(&mut self, now: Instant) -> bool {
        self.playing = !self.playing;
        self.reschedule_autoplay(now);
        true
    }

    pub fn toggle_fullscreen(&mut self, now: Instant) -> bool {
        if self.fullscreen {
            self.exit_fullscreen()
        } else {
            self.fullscreen = true;
            self.controls_visible = true;
            self.controls_hide_at = Some(now + self.controls_hide_delay);
            true
        }
    }

    pub fn exit_fullscreen(&mut self) -> bool {
        if !self.fullscreen {
            return false;
        }
        self.fullscreen = false;
        self.controls_visible = true;
        self.controls_hide_at = None;
        true
    }

    pub fn toggle_settings(&mut self, now: Instant) -> bool {
        if self.settings_open {
            self.close_settings(now);
        } else {
            self.settings_open = true;
            self.settings_armed_at = Some(now + self.settings_arm_delay);
        }
        true
    }

    /// Sets the preset and closes the menu as one transition.
    pub fn select_speed(&mut self, speed: Speed, now: Instant) -> bool {
        let changed = self.speed != speed;
        self.speed = speed;
        let closed = self.close_settings(now);
        if changed {
            self.reschedule_autoplay(now);
        }
        changed || closed
    }

    pub fn pointer_down(&mut self, target: PointerTarget, now: Instant) -> bool {
        if !self.settings_open || target != PointerTarget::Elsewhere {
            return false;
        }
        let armed = self.settings_armed_at.is_some_and(|at| now >= at);
        if !armed {
            return false;
        }
        self.close_settings(now)
    }

    pub fn pointer_moved(&mut self, now: Instant) -> bool {
        if !self.fullscreen {
            return false;
        }
        let was_hidden = !self.controls_visible;
        self.controls_visible = true;
        self.controls_hide_at = Some(now + self.controls_hide_delay);
        was_hidden
    }

    pub fn toggle_gallery(&mut self) -> bool {
        self.gallery_open = !self.gallery_open;
        if self.gallery_open {
            self.gallery_header_visible = true;
        }
        true
    }

    /// Jumps to thumbnail `index`, pauses, and closes the overlay as one transition.
    pub fn select_thumbnail(&mut self, index: usize, now: Instant) -> bool {
        if !self.gallery_open || index >= self.len {
            return false;
        }
        self.current = index;
        self.playing = false;
        self.gallery_open = false;
        self.reschedule_autoplay(now);
        true
    }

    pub fn gallery_scrolled(&mut self, offset: u32) -> bool {
        if !self.gallery_open {
            return false;
        }
        let visible = offset < self.gallery_header_threshold;
        let changed = visible != self.gallery_header_visible;
        self.gallery_header_visible = visible;
        changed
    }

    /// Fires every deadline that is due at `now`.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if let Some(at) = self.next_advance_at {
            if now >= at {
                changed |= self.next();
                let period = self.speed.interval();
                let next = at + period;
                self.next_advance_at = Some(if next > now { next } else { now + period });
            }
        }

        if let Some(at) = self.controls_hide_at {
            if now >= at {
                self.controls_hide_at = None;
                if !self.settings_open && self.controls_visible {
                    self.controls_visible = false;
                    changed = true;
                }
            }
        }

        changed
    }

    pub fn frame(&self, items: &[GalleryItem]) -> Option<SlideFrame> {
        let item = items.get(self.current()?)?.clone();
        Some(SlideFrame {
            index: self.current,
            count: self.len,
            item,
            playing: self.playing,
            fullscreen: self.fullscreen,
            speed: self.speed,
            settings_open: self.settings_open,
            gallery_open: self.gallery_open,
            gallery_header_visible: self.gallery_header_visible,
            controls_visible: self.controls_visible(),
        })
    }

    fn close_settings(&mut self, now: Instant) -> bool {
        if !self.settings_open {
            return false;
        }
        self.settings_open = false;
        self.settings_armed_at = None;
        if self.fullscreen {
            self.controls_hide_at = Some(now + self.controls_hide_delay);
        }
        true
    }

    // Any change to playing, item count or speed restarts the period from `now`.
    fn reschedule_autoplay(&mut self, now: Instant) {
        self.next_advance_at = (self.playing && self.len > 1).then(|| now + self.speed.interval());
    }
}
