//! MIME type resolution for uploads.

use crate::domain::ImageInput;
use image::ImageFormat;

/// MIME type used when nothing better is known.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Works out the MIME type of an upload.
///
/// A non-empty declared type is trusted as is. Otherwise the file extension is
/// used, then the leading bytes.
pub fn resolve_mime(input: &ImageInput) -> String {
    if let Some(declared) = input.declared_mime().map(str::trim)
        && !declared.is_empty()
    {
        return declared.to_ascii_lowercase();
    }

    if let Some(format) = input.name().and_then(|name| ImageFormat::from_path(name).ok()) {
        return format.to_mime_type().to_string();
    }

    image::guess_format(input.bytes())
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| OCTET_STREAM.to_string())
}

/// True for `image/*` types.
pub fn is_image_mime(mime: &str) -> bool {
    mime.get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn test_declared_type_wins() {
        let input = ImageInput::new(PNG_MAGIC)
            .with_mime("text/plain")
            .with_name("photo.png");
        assert_eq!(resolve_mime(&input), "text/plain");
    }

    #[test]
    fn test_extension_then_content() {
        let input = ImageInput::new(b"whatever".as_slice()).with_name("photo.JPG");
        assert_eq!(resolve_mime(&input), "image/jpeg");

        let input = ImageInput::new(PNG_MAGIC).with_mime("  ");
        assert_eq!(resolve_mime(&input), "image/png");

        let input = ImageInput::new(b"%PDF-1.7".as_slice()).with_name("doc.pdf");
        assert_eq!(resolve_mime(&input), OCTET_STREAM);
    }

    #[test]
    fn test_is_image_mime() {
        assert!(is_image_mime("image/png"));
        assert!(is_image_mime("IMAGE/webp"));
        assert!(!is_image_mime("application/pdf"));
        assert!(!is_image_mime("image"));
        assert!(!is_image_mime(""));
    }
}
