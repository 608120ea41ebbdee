//! Format-parameter (`a=fmtp`) equivalence.
//!
//! A format-parameter line is a `;` separated list of `key=value` tokens. Two
//! lines are compared as unordered sets of parameters; keys and values are
//! compared ASCII case-insensitively and surrounding whitespace is ignored, so
//! `minptime=10; useinbandfec=1` and `useinbandfec=1;minptime=10` are the same line.

use crate::configuration::media_engine::{MIME_TYPE_G722, MIME_TYPE_PCMA, MIME_TYPE_PCMU};
use crate::rtp_transceiver::rtp_codec::RTCRtpCodec;
use std::collections::HashMap;
use unicase::UniCase;

/// Associated payload type parameter of a retransmission codec.
pub(crate) const FMTP_APT: &str = "apt";

/// Codecs for which format parameters carry no negotiable meaning.
const MIME_TYPES_WITHOUT_FMTP: [&str; 3] = [MIME_TYPE_PCMU, MIME_TYPE_PCMA, MIME_TYPE_G722];

/// Outcome of comparing two format-parameter lines.
///
/// Variants are ordered from worst to best so candidates can be ranked with `max`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FmtpMatch {
    /// Both lines are set and describe different parameter sets.
    Incompatible,
    /// At least one line is empty (unconstrained), or the codec defines no
    /// parameter semantics.
    Compatible,
    /// Both lines are set and describe the same parameter set.
    Exact,
}

/// Parsed format-parameter line.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Fmtp {
    parameters: HashMap<String, String>,
}

impl Fmtp {
    /// Parses a raw format-parameter line. Tokens without `=` become keys with
    /// an empty value; a repeated key keeps its last value.
    pub fn parse(line: &str) -> Self {
        let parameters = line
            .split(';')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| match token.split_once('=') {
                Some((key, value)) => (
                    key.trim().to_ascii_lowercase(),
                    value.trim().to_ascii_lowercase(),
                ),
                None => (token.to_ascii_lowercase(), String::new()),
            })
            .collect();

        Fmtp { parameters }
    }

    /// Returns true if no parameter is set.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Returns the value of parameter `key`, if present.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns a copy of these parameters without `key`.
    pub(crate) fn without(&self, key: &str) -> Fmtp {
        let mut parameters = self.parameters.clone();
        parameters.remove(&key.to_ascii_lowercase());
        Fmtp { parameters }
    }

    /// Classifies these parameters against `other`.
    pub fn equivalence(&self, other: &Fmtp) -> FmtpMatch {
        if self.is_empty() || other.is_empty() {
            FmtpMatch::Compatible
        } else if self == other {
            FmtpMatch::Exact
        } else {
            FmtpMatch::Incompatible
        }
    }
}

/// Rewrites the `apt` parameter of a retransmission format line to `payload_type`,
/// leaving every other token untouched.
pub(crate) fn with_apt(line: &str, payload_type: u8) -> String {
    let mut found = false;
    let mut tokens: Vec<String> = line
        .split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once('=') {
            Some((key, _)) if key.trim().eq_ignore_ascii_case(FMTP_APT) => {
                found = true;
                format!("{FMTP_APT}={payload_type}")
            }
            _ => token.to_owned(),
        })
        .collect();
    if !found {
        tokens.insert(0, format!("{FMTP_APT}={payload_type}"));
    }
    tokens.join(";")
}

/// Compares two format-parameter lines of codec `mime_type`.
pub fn fmtp_equivalence(mime_type: &str, a: &str, b: &str) -> FmtpMatch {
    let mime_type = UniCase::new(mime_type);
    if MIME_TYPES_WITHOUT_FMTP
        .iter()
        .any(|m| UniCase::new(*m) == mime_type)
    {
        return FmtpMatch::Compatible;
    }

    Fmtp::parse(a).equivalence(&Fmtp::parse(b))
}

/// Returns true if two codecs share mime type, clock rate and channel count, the
/// prerequisite for comparing their format parameters at all.
///
/// Mime types compare case-insensitively. A channel count of 0 means "not
/// applicable" and matches any count.
pub fn codec_tuple_matches(a: &RTCRtpCodec, b: &RTCRtpCodec) -> bool {
    UniCase::new(a.mime_type.as_str()) == UniCase::new(b.mime_type.as_str())
        && a.clock_rate == b.clock_rate
        && (a.channels == 0 || b.channels == 0 || a.channels == b.channels)
}
