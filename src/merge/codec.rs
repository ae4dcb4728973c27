use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

static VIDEO_CODEC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Video: ([A-Za-z0-9_]+)").expect("video codec pattern is valid"));

/// Output container, selected by the output file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Container {
    /// MPEG-4 (H.264 + AAC).
    Mp4,
    /// WebM (VP8/VP9 + Opus).
    Webm,
}

impl Container {
    /// Container for a recognized extension (case-insensitive, without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp4" => Some(Self::Mp4),
            "webm" => Some(Self::Webm),
            _ => None,
        }
    }

    /// Container for `path`; unrecognized extensions get the MP4 codec set.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .unwrap_or(Self::Mp4)
    }

    /// Encoder used when the source codec cannot be stream-copied into this container.
    pub fn native_video_encoder(self) -> VideoEncoder {
        match self {
            Self::Mp4 => VideoEncoder::H264,
            Self::Webm => VideoEncoder::Vp8,
        }
    }

    /// The container's single default audio codec.
    pub fn audio_codec(self) -> AudioCodec {
        match self {
            Self::Mp4 => AudioCodec::Aac,
            Self::Webm => AudioCodec::Opus,
        }
    }
}

/// Codec family of the recorded video stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecFamily {
    /// H.264 / AVC.
    H264,
    /// VP8 or VP9.
    Vp8Vp9,
    /// No recognizable signature.
    Unknown,
}

impl CodecFamily {
    /// Detect the first video stream's codec family from an engine metadata dump.
    pub fn detect(dump: &str) -> Self {
        let Some(caps) = VIDEO_CODEC_TOKEN.captures(dump) else {
            return Self::Unknown;
        };
        match &caps[1] {
            "h264" => Self::H264,
            "vp8" | "vp9" => Self::Vp8Vp9,
            _ => Self::Unknown,
        }
    }
}

/// Video encoders the merger can transcode to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoEncoder {
    /// `libx264`.
    H264,
    /// `libvpx`.
    Vp8,
}

impl VideoEncoder {
    /// Engine arguments selecting and tuning this encoder.
    pub fn args(self) -> &'static [&'static str] {
        match self {
            Self::H264 => &["-c:v", "libx264", "-preset", "fast", "-crf", "23"],
            Self::Vp8 => &["-c:v", "libvpx", "-b:v", "1M", "-crf", "10"],
        }
    }
}

/// What happens to the video stream during the merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputVideoCodec {
    /// Re-mux the encoded bytes as-is.
    Copy,
    /// Re-encode with the given encoder.
    Transcode(VideoEncoder),
}

impl OutputVideoCodec {
    /// Engine arguments for this choice.
    pub fn args(self) -> &'static [&'static str] {
        match self {
            Self::Copy => &["-c:v", "copy"],
            Self::Transcode(enc) => enc.args(),
        }
    }

    /// Return `true` when the video is re-encoded.
    pub fn is_transcode(self) -> bool {
        matches!(self, Self::Transcode(_))
    }
}

/// Audio codec of the merged output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCodec {
    /// AAC at 192 kbit/s.
    Aac,
    /// Opus at 128 kbit/s.
    Opus,
}

impl AudioCodec {
    /// Engine arguments selecting and tuning this encoder.
    pub fn args(self) -> &'static [&'static str] {
        match self {
            Self::Aac => &["-c:a", "aac", "-b:a", "192k"],
            Self::Opus => &["-c:a", "libopus", "-b:a", "128k"],
        }
    }
}

/// Compatibility table: how a `source` video ends up in `container`.
///
/// Native pairings are stream-copied; everything else, including unrecognized sources, is
/// transcoded to the container's native encoder.
pub fn video_codec_for(source: CodecFamily, container: Container) -> OutputVideoCodec {
    match (source, container) {
        (CodecFamily::H264, Container::Mp4) => OutputVideoCodec::Copy,
        (CodecFamily::Vp8Vp9, Container::Webm) => OutputVideoCodec::Copy,
        (CodecFamily::Vp8Vp9, Container::Mp4) => OutputVideoCodec::Transcode(VideoEncoder::H264),
        (CodecFamily::H264, Container::Webm) => OutputVideoCodec::Transcode(VideoEncoder::Vp8),
        (CodecFamily::Unknown, c) => OutputVideoCodec::Transcode(c.native_video_encoder()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/merge/codec.rs"]
mod tests;
