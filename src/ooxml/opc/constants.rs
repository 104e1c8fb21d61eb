//! Constant values related to the Open Packaging Convention.
//!
//! Content types for media parts, relationship types used in presentation
//! packages, and the conventional partnames used when relationships are missing.

/// Content type URIs (like MIME-types) that specify a part's format
pub mod content_type {
    // Image content types
    pub const BMP: &str = "image/bmp";
    pub const GIF: &str = "image/gif";
    pub const JPEG: &str = "image/jpeg";
    pub const PNG: &str = "image/png";
    pub const SVG: &str = "image/svg+xml";
    pub const TIFF: &str = "image/tiff";
    pub const WEBP: &str = "image/webp";
    pub const X_EMF: &str = "image/x-emf";
    pub const X_WMF: &str = "image/x-wmf";

    // Video and audio content types
    pub const AVI: &str = "video/avi";
    pub const MP4: &str = "video/mp4";
    pub const MPEG: &str = "video/mpeg";
    pub const QUICKTIME: &str = "video/quicktime";
    pub const WMV: &str = "video/x-ms-wmv";
    pub const M4A: &str = "audio/mp4";
    pub const MP3: &str = "audio/mpeg";
    pub const WAV: &str = "audio/wav";
    pub const WMA: &str = "audio/x-ms-wma";

    pub const OCTET_STREAM: &str = "application/octet-stream";

    /// Guess an image content type from a part extension.
    pub fn for_image_ext(ext: &str) -> &'static str {
        match ext.to_ascii_lowercase().as_str() {
            "bmp" => BMP,
            "gif" => GIF,
            "jpg" | "jpeg" | "jpe" => JPEG,
            "png" => PNG,
            "svg" => SVG,
            "tif" | "tiff" => TIFF,
            "webp" => WEBP,
            "emf" => X_EMF,
            "wmf" => X_WMF,
            _ => OCTET_STREAM,
        }
    }

    /// Guess a video or audio content type from a part extension.
    pub fn for_media_ext(ext: &str) -> &'static str {
        match ext.to_ascii_lowercase().as_str() {
            "avi" => AVI,
            "mp4" | "m4v" => MP4,
            "mpg" | "mpeg" => MPEG,
            "mov" => QUICKTIME,
            "wmv" => WMV,
            "m4a" => M4A,
            "mp3" => MP3,
            "wav" => WAV,
            "wma" => WMA,
            _ => OCTET_STREAM,
        }
    }
}

/// Open XML relationship target modes
pub mod target_mode {
    /// Internal relationship target mode (default)
    pub const INTERNAL: &str = "Internal";

    /// External relationship target mode (e.g., linked images, hyperlinks)
    pub const EXTERNAL: &str = "External";
}

/// Relationship type URIs used in presentation packages
pub mod relationship_type {
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const EXTENDED_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";

    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const NOTES_SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";

    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
}

/// Well-known part names used when relationships are missing
pub mod part_name {
    pub const PRESENTATION: &str = "/ppt/presentation.xml";
    pub const CORE_PROPERTIES: &str = "/docProps/core.xml";
    pub const APP_PROPERTIES: &str = "/docProps/app.xml";
}
