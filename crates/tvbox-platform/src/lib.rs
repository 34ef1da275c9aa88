//! Platform services for the TV Box launcher.
//!
//! The launcher core talks to its host only through the traits in this
//! crate. Each trait ships with a desktop implementation built on `std`.

pub mod media;
pub mod services;
pub mod store;

pub use media::{AudioSink, HandleRegistry, MediaHandles, NullAudio};
pub use services::{
    Activator, DesktopPlatform, Launch, LogActivator, LogToaster, TimeService, Toast, Toaster,
};
pub use store::{FileStore, MemoryStore, SettingsStore};
