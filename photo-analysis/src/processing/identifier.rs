use md5::{Digest, Md5};

/// Content-derived photo id: the lowercase hex MD5 of the URI's UTF-8 bytes.
///
/// Used as a stable key, not for integrity.
pub fn photo_id(image_uri: &str) -> String {
    let digest = Md5::digest(image_uri.as_bytes());
    format!("{digest:x}")
}
