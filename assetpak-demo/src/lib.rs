//! Example consumer of generated asset tables.
//!
//! `build.rs` renders `assets/` into two modules:
//!
//! - [`plain`] stores raw bytes with captured file metadata, offers
//!   zero-copy `fetch_view` and can restore assets to disk
//! - [`packed`] stores GZIP'd bytes under content-hashed names, resolved
//!   through `resolve_name`

use std::io;

#[allow(dead_code, clippy::all, clippy::pedantic)]
pub mod plain {
    include!(concat!(env!("OUT_DIR"), "/plain.rs"));
}

#[allow(dead_code, clippy::all, clippy::pedantic)]
pub mod packed {
    include!(concat!(env!("OUT_DIR"), "/packed.rs"));
}

/// Read a packed asset by its original name as UTF-8 text.
pub fn packed_text(name: &str) -> io::Result<String> {
    let (data, _) = packed::fetch(packed::resolve_name(name)?)?;
    String::from_utf8(data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Hash-qualified URL path for a stylesheet or script, for cache-busting links.
pub fn asset_url(name: &str) -> io::Result<String> {
    Ok(format!("/{}", packed::resolve_name(name)?))
}
