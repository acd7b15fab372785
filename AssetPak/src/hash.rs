//! Content hashing and hash-qualified names

use std::fs::File;
use std::path::Path;

use base64::Engine as _;
use sha2::{Digest, Sha512};

use crate::config::{HashEncoding, HashFormat};

/// Compute the SHA-512 digest of a file, streaming its contents.
///
/// # Errors
/// Returns an error if the file cannot be opened or read.
pub fn hash_file<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(path.as_ref())?;
    let mut hasher = Sha512::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(hasher.finalize().to_vec())
}

/// Digest of an in-memory buffer.
pub fn hash_bytes(data: &[u8]) -> Vec<u8> {
    Sha512::digest(data).to_vec()
}

/// Render a digest as text, keeping at most `length` characters (0 = all).
pub fn encode_hash(hash: &[u8], encoding: HashEncoding, length: usize) -> String {
    let mut text = match encoding {
        HashEncoding::Hex => hex::encode(hash),
        HashEncoding::Base32 => {
            base32::encode(base32::Alphabet::Rfc4648Lower { padding: false }, hash)
        }
        HashEncoding::Base64 => base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(hash),
    };
    if length > 0 && length < text.len() {
        text.truncate(length);
    }
    text
}

/// Build the hash-qualified form of a logical name.
///
/// `name` is a forward-slash path; `encoded` is the output of [`encode_hash`].
pub fn qualify_name(name: &str, encoded: &str, format: HashFormat) -> String {
    let (dir, file) = match name.rfind('/') {
        Some(idx) => name.split_at(idx + 1),
        None => ("", name),
    };
    // `.profile` has no extension, `a.tar.gz` has `.gz`
    let ext = match file.rfind('.') {
        Some(idx) if idx > 0 => &file[idx..],
        _ => "",
    };
    let stem = &file[..file.len() - ext.len()];

    match format {
        HashFormat::NoHash | HashFormat::NameUnchanged => name.to_string(),
        HashFormat::DirHash => format!("{dir}{encoded}/{file}"),
        HashFormat::NameHashSuffix => format!("{dir}{stem}-{encoded}{ext}"),
        HashFormat::HashWithExt => format!("{dir}{encoded}{ext}"),
    }
}
