pub mod address;
pub mod collection;
pub mod config;
pub mod error;
pub mod events;
pub mod session;
pub mod tasks {
    pub mod fetcher;
    pub mod input;
    pub mod slideshow;
    pub mod viewer;
}
