//! Advanced configuration for the media engine.
//!
//! The `SettingEngine` controls how the [`API`](crate::api::API) hands out
//! media engine instances and how those instances negotiate. Unlike the
//! [`MediaEngine`](crate::configuration::media_engine::MediaEngine), which
//! describes *what* is supported, the `SettingEngine` describes *how* it is used.
//!
//! # Examples
//!
//! ```
//! use rtc_media_engine::api::APIBuilder;
//! use rtc_media_engine::configuration::setting_engine::SettingEngine;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut setting_engine = SettingEngine::default();
//!
//! // Every connection shares one instance and keeps negotiating into it
//! setting_engine.disable_media_engine_copy(true);
//! setting_engine.set_media_engine_compatibility_mode(true);
//!
//! let api = APIBuilder::new()
//!     .with_setting_engine(Arc::new(setting_engine))
//!     .build();
//! # Ok(())
//! # }
//! ```

/// Behavioral knobs applied to every media engine instance created by an
/// [`API`](crate::api::API).
#[derive(Default, Debug, Clone)]
pub struct SettingEngine {
    pub(crate) disable_media_engine_copy: bool,
    pub(crate) media_engine_compatibility_mode: bool,
}

impl SettingEngine {
    /// Prevents the MediaEngine from being copied for each connection.
    ///
    /// By default, each connection gets a copy of the MediaEngine, allowing
    /// independent codec configurations. Disabling this hands out one shared
    /// instance, so negotiation on one connection is visible to all others and
    /// negotiation passes from different connections serialize on its lock.
    pub fn disable_media_engine_copy(&mut self, is_disabled: bool) {
        self.disable_media_engine_copy = is_disabled;
    }

    /// Keeps matching already negotiated media kinds on later negotiation passes.
    ///
    /// By default a media kind is frozen after its first successful negotiation
    /// and later remote descriptions only refresh its header extensions. Some
    /// peers re-offer codecs under new payload types on every round; with
    /// compatibility mode enabled those are matched again and merged into the
    /// negotiated table.
    pub fn set_media_engine_compatibility_mode(&mut self, is_enabled: bool) {
        self.media_engine_compatibility_mode = is_enabled;
    }
}
