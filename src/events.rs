use crate::collection::GalleryItem;
use crate::config::Speed;

/// Keys the slideshow listens to while it is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Space,
    Escape,
    Char(char),
}

/// What the slideshow did with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyOutcome {
    pub handled: bool,
    /// Something visible changed, so a new frame is due.
    pub changed: bool,
    /// The host should suppress its default action (page scroll for Space).
    pub prevent_default: bool,
}

/// Where a pointer-down landed, as far as the settings menu cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    SettingsButton,
    SettingsMenu,
    Elsewhere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideshowCommand {
    Next,
    Previous,
    TogglePlay,
    ToggleFullscreen,
    ToggleSettings,
    SelectSpeed(Speed),
    PointerDown(PointerTarget),
    PointerMoved,
    ToggleGallery,
    SelectThumbnail(usize),
    GalleryScrolled(u32),
    Key(Key),
}

/// Everything a front end reads from the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Slideshow(SlideshowCommand),
    SubmitWallet(String),
    ExampleWallet,
    ChangeWallet,
    Quit,
}

/// Snapshot of the slideshow emitted after every state change.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideFrame {
    pub index: usize,
    pub count: usize,
    pub item: GalleryItem,
    pub playing: bool,
    pub fullscreen: bool,
    pub speed: Speed,
    pub settings_open: bool,
    pub gallery_open: bool,
    pub gallery_header_visible: bool,
    /// Fullscreen overlay visibility; always true outside fullscreen.
    pub controls_visible: bool,
}

impl SlideFrame {
    /// 1-based position, as shown in the progress readout.
    pub fn position(&self) -> usize {
        self.index + 1
    }
}
