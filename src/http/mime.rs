//! MIME type detection module
//!
//! Maps file extensions onto a closed set of content types and precomputes
//! the `Content-Type` header line each response carries.

use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContentType {
    /// No `Content-Type` line is emitted
    None,
    #[default]
    TextHtml,
    TextPlain,
    TextCss,
    TextXml,
    ApplicationJson,
    ApplicationXml,
    ApplicationJavascript,
    ApplicationWasm,
    ApplicationPdf,
    ApplicationZip,
    ApplicationGzip,
    ApplicationTar,
    ApplicationFontEot,
    OctetStream,
    ImagePng,
    ImageJpeg,
    ImageGif,
    ImageSvg,
    ImageIcon,
    ImageWebp,
    VideoMp4,
    VideoWebm,
    VideoOgg,
    VideoQuicktime,
    VideoAvi,
    AudioMpeg,
    AudioWav,
    AudioFlac,
    AudioMp4,
    FontWoff,
    FontWoff2,
    FontTtf,
    FontOtf,
    /// Caller-supplied MIME string
    Custom(String),
}

impl ContentType {
    /// Get content type based on file extension (case-insensitive)
    ///
    /// # Examples
    /// ```
    /// use rust_http_response::http::mime::ContentType;
    /// assert_eq!(ContentType::from_extension(Some("html")), ContentType::TextHtml);
    /// assert_eq!(ContentType::from_extension(Some("MP4")), ContentType::VideoMp4);
    /// assert_eq!(ContentType::from_extension(None), ContentType::OctetStream);
    /// ```
    pub fn from_extension(extension: Option<&str>) -> Self {
        let Some(ext) = extension else {
            return Self::OctetStream;
        };
        match ext.to_ascii_lowercase().as_str() {
            // Text
            "html" | "htm" => Self::TextHtml,
            "css" => Self::TextCss,
            "txt" | "md" => Self::TextPlain,
            "xml" => Self::ApplicationXml,
            "xsl" => Self::TextXml,

            // JavaScript/WASM
            "js" | "mjs" => Self::ApplicationJavascript,
            "json" => Self::ApplicationJson,
            "wasm" => Self::ApplicationWasm,

            // Images
            "png" => Self::ImagePng,
            "jpg" | "jpeg" => Self::ImageJpeg,
            "gif" => Self::ImageGif,
            "svg" => Self::ImageSvg,
            "ico" => Self::ImageIcon,
            "webp" => Self::ImageWebp,

            // Video
            "mp4" => Self::VideoMp4,
            "webm" => Self::VideoWebm,
            "ogg" | "ogv" => Self::VideoOgg,
            "mov" => Self::VideoQuicktime,
            "avi" => Self::VideoAvi,

            // Audio
            "mp3" => Self::AudioMpeg,
            "wav" => Self::AudioWav,
            "flac" => Self::AudioFlac,
            "m4a" => Self::AudioMp4,

            // Fonts
            "woff" => Self::FontWoff,
            "woff2" => Self::FontWoff2,
            "ttf" => Self::FontTtf,
            "otf" => Self::FontOtf,
            "eot" => Self::ApplicationFontEot,

            // Documents
            "pdf" => Self::ApplicationPdf,
            "zip" => Self::ApplicationZip,
            "gz" | "gzip" => Self::ApplicationGzip,
            "tar" => Self::ApplicationTar,

            _ => Self::OctetStream,
        }
    }

    /// Content type from the extension of a file name or path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::from_extension(path.as_ref().extension().and_then(|e| e.to_str()))
    }

    pub fn mime_str(&self) -> &str {
        match self {
            Self::None => "",
            Self::TextHtml => "text/html; charset=utf-8",
            Self::TextPlain => "text/plain; charset=utf-8",
            Self::TextCss => "text/css",
            Self::TextXml => "text/xml; charset=utf-8",
            Self::ApplicationJson => "application/json; charset=utf-8",
            Self::ApplicationXml => "application/xml",
            Self::ApplicationJavascript => "application/javascript",
            Self::ApplicationWasm => "application/wasm",
            Self::ApplicationPdf => "application/pdf",
            Self::ApplicationZip => "application/zip",
            Self::ApplicationGzip => "application/gzip",
            Self::ApplicationTar => "application/x-tar",
            Self::ApplicationFontEot => "application/vnd.ms-fontobject",
            Self::OctetStream => "application/octet-stream",
            Self::ImagePng => "image/png",
            Self::ImageJpeg => "image/jpeg",
            Self::ImageGif => "image/gif",
            Self::ImageSvg => "image/svg+xml",
            Self::ImageIcon => "image/x-icon",
            Self::ImageWebp => "image/webp",
            Self::VideoMp4 => "video/mp4",
            Self::VideoWebm => "video/webm",
            Self::VideoOgg => "video/ogg",
            Self::VideoQuicktime => "video/quicktime",
            Self::VideoAvi => "video/x-msvideo",
            Self::AudioMpeg => "audio/mpeg",
            Self::AudioWav => "audio/wav",
            Self::AudioFlac => "audio/flac",
            Self::AudioMp4 => "audio/mp4",
            Self::FontWoff => "font/woff",
            Self::FontWoff2 => "font/woff2",
            Self::FontTtf => "font/ttf",
            Self::FontOtf => "font/otf",
            Self::Custom(mime) => mime,
        }
    }

    /// Full header line including the trailing CRLF; empty for `None`
    pub fn header_line(&self) -> String {
        match self {
            Self::None => String::new(),
            other => format!("Content-Type: {}\r\n", other.mime_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(ContentType::from_extension(Some("html")), ContentType::TextHtml);
        assert_eq!(ContentType::from_extension(Some("css")), ContentType::TextCss);
        assert_eq!(
            ContentType::from_extension(Some("js")),
            ContentType::ApplicationJavascript
        );
        assert_eq!(
            ContentType::from_extension(Some("json")),
            ContentType::ApplicationJson
        );
        assert_eq!(ContentType::from_extension(Some("PNG")), ContentType::ImagePng);
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(ContentType::from_extension(Some("xyz")), ContentType::OctetStream);
        assert_eq!(ContentType::from_path("/var/www/README"), ContentType::OctetStream);
    }

    #[test]
    fn test_header_line() {
        assert_eq!(
            ContentType::ImagePng.header_line(),
            "Content-Type: image/png\r\n"
        );
        assert_eq!(ContentType::None.header_line(), "");
        assert_eq!(
            ContentType::Custom("text/event-stream".to_string()).header_line(),
            "Content-Type: text/event-stream\r\n"
        );
    }
}
