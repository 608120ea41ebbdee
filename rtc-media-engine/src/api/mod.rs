use crate::configuration::media_engine::MediaEngine;
use crate::configuration::setting_engine::SettingEngine;
use crate::instance::MediaEngineInstance;
use log::debug;
use std::sync::Arc;

/// API bundles a capability template with the settings that control how
/// connections use it.
///
/// Each call to [`new_media_engine_instance`](API::new_media_engine_instance)
/// yields the media engine for one connection.
///
/// # Examples
///
/// ```
/// use rtc_media_engine::api::APIBuilder;
/// use rtc_media_engine::configuration::media_engine::MediaEngine;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut media_engine = MediaEngine::default();
/// media_engine.register_default_codecs()?;
///
/// let api = APIBuilder::new().with_media_engine(media_engine).build();
///
/// let first = api.new_media_engine_instance();
/// let second = api.new_media_engine_instance();
/// assert!(!first.ptr_eq(&second));
/// # Ok(())
/// # }
/// ```
pub struct API {
    pub(crate) setting_engine: Arc<SettingEngine>,
    pub(crate) media_engine: MediaEngine,
    pub(crate) shared_instance: Option<MediaEngineInstance>,
}

impl API {
    /// Returns the media engine instance for a new connection.
    ///
    /// By default this is an isolated deep copy of the template. If
    /// [`SettingEngine::disable_media_engine_copy`] is set, every call returns a
    /// handle to the same shared instance instead.
    pub fn new_media_engine_instance(&self) -> MediaEngineInstance {
        match &self.shared_instance {
            Some(instance) => instance.share(),
            None => {
                debug!("copying media engine for new instance");
                MediaEngineInstance::new(
                    self.media_engine.clone(),
                    self.setting_engine.media_engine_compatibility_mode,
                )
            }
        }
    }

    /// Returns the internal [`SettingEngine`].
    pub fn setting_engine(&self) -> &SettingEngine {
        &self.setting_engine
    }

    /// Returns the [`MediaEngine`] template the API was built with.
    ///
    /// With media engine copying disabled, codecs and header extensions
    /// registered through the shared instance are not reflected here; query
    /// [`MediaEngineInstance::media_engine`] on an instance for the live registry.
    pub fn media_engine(&self) -> &MediaEngine {
        &self.media_engine
    }
}

#[derive(Default)]
pub struct APIBuilder {
    setting_engine: Option<Arc<SettingEngine>>,
    media_engine: Option<MediaEngine>,
}

impl APIBuilder {
    pub fn new() -> Self {
        APIBuilder::default()
    }

    /// Builds the API. Missing engines are replaced by their defaults; with
    /// media engine copying disabled the shared instance is created here.
    pub fn build(self) -> API {
        let setting_engine = self.setting_engine.unwrap_or_default();
        let media_engine = self.media_engine.unwrap_or_default();

        let shared_instance = if setting_engine.disable_media_engine_copy {
            Some(MediaEngineInstance::new(
                media_engine.clone(),
                setting_engine.media_engine_compatibility_mode,
            ))
        } else {
            None
        };

        API {
            setting_engine,
            media_engine,
            shared_instance,
        }
    }

    /// Settings are read once, in [`build`](APIBuilder::build).
    pub fn with_setting_engine(mut self, setting_engine: Arc<SettingEngine>) -> Self {
        self.setting_engine = Some(setting_engine);
        self
    }

    /// Sets the capability template every instance starts from.
    pub fn with_media_engine(mut self, media_engine: MediaEngine) -> Self {
        self.media_engine = Some(media_engine);
        self
    }
}
