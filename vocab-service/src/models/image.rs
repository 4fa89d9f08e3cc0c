use std::path::Path;

/// Guess an image mime type from a file name's extension.
pub fn image_mime_from_extension(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();

    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "bmp" => "image/bmp",
        _ => return None,
    };

    Some(mime)
}

/// Pick the mime type to forward upstream: the declared content type when it
/// is specific, otherwise a guess from the file name.
pub fn resolve_image_mime(content_type: Option<&str>, file_name: Option<&str>) -> Option<String> {
    let declared = content_type
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty() && ct != "application/octet-stream");

    declared.or_else(|| file_name.and_then(image_mime_from_extension).map(str::to_string))
}
