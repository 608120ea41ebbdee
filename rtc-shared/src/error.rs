use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// ErrUnknownType indicates an error with Unknown info.
    #[error("unknown")]
    ErrUnknownType,

    /// ErrCodecNotFound is returned when a codec search to the Media Engine fails
    #[error("codec not found")]
    ErrCodecNotFound,

    /// ErrNoCommonCodec indicates that a remote media section could not be matched
    /// against any locally registered codec of the same kind
    #[error("no common codec for {0} media section")]
    ErrNoCommonCodec(String),

    /// ErrRegisterHeaderExtensionInvalidDirection indicates that a extension was registered with
    /// a direction restriction other than sendonly or recvonly
    #[error("a header extension must be registered with sendonly, recvonly or no direction")]
    ErrRegisterHeaderExtensionInvalidDirection,

    /// ErrRegisterHeaderExtensionNoFreeID indicates that there was no extension ID available which
    /// in turn means that all 14 available id(1..=14) have been used.
    #[error("no header extension ID was free to use(this means the maximum of 14 extensions have been registered)")]
    ErrRegisterHeaderExtensionNoFreeID,

    /// ErrInvalidMediaEngineConfig indicates that a serialized capability template
    /// could not be turned into a MediaEngine
    #[error("invalid media engine config: {0}")]
    ErrInvalidMediaEngineConfig(String),
}
