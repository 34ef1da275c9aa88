//! TV Box launcher core.
//!
//! Platform-agnostic home-screen logic: the persisted settings document,
//! the section model built from it, the focus-navigation state machine,
//! key dispatch, tile activation, theme propagation, the clock, the admin
//! panel, and the local-music previewer. Hosts supply the platform services
//! from `tvbox-platform` and a [`render::Renderer`].

// Re-exports from tvbox-types and tvbox-platform.
pub use tvbox_platform as platform;
pub use tvbox_types::config;
pub use tvbox_types::error;
pub use tvbox_types::input;

pub mod activation;
pub mod admin;
pub mod clock;
pub mod dispatch;
pub mod focus;
pub mod icons;
pub mod launcher;
pub mod music;
pub mod render;
pub mod section;
pub mod settings;
pub mod theme;
