//! Stylesheet fingerprinting for the parts store pages.
//!
//! `base.html` links `/static/css/derived/main.<hash>.css`. This script hashes
//! `static/css/main.css`, writes the copy under that name, prunes copies left
//! from earlier builds, and exposes the hash to the crate as `CSS_HASH`.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Hex characters of the digest kept in the file name.
const FINGERPRINT_LEN: usize = 8;

fn main() {
    let manifest_dir = PathBuf::from(
        env::var_os("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by Cargo"),
    );
    let stylesheet = manifest_dir.join("static/css/main.css");
    println!("cargo:rerun-if-changed={}", stylesheet.display());

    let fingerprint = publish_stylesheet(&stylesheet, &manifest_dir.join("static/css/derived"))
        .unwrap_or_else(|e| panic!("cannot fingerprint {}: {e}", stylesheet.display()));
    println!("cargo:rustc-env=CSS_HASH={fingerprint}");
}

/// Copy `source` into `derived` as `main.<fingerprint>.css` and return the
/// fingerprint.
fn publish_stylesheet(source: &Path, derived: &Path) -> io::Result<String> {
    let css = fs::read(source)?;
    let fingerprint = fingerprint(&css);
    let file_name = format!("main.{fingerprint}.css");

    fs::create_dir_all(derived)?;
    for entry in fs::read_dir(derived)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with("main.") && name.ends_with(".css") && name != file_name {
            fs::remove_file(entry.path())?;
        }
    }
    fs::write(derived.join(&file_name), css)?;

    Ok(fingerprint)
}

fn fingerprint(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .take(FINGERPRINT_LEN / 2)
        .fold(String::with_capacity(FINGERPRINT_LEN), |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        })
}
