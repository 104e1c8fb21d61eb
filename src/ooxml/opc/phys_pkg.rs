//! Provides a general interface to a physical OPC package (ZIP file).
//!
//! This module handles the low-level reading of OPC packages from ZIP archives.
//! Every member is inflated exactly once into an immutable map; the reader
//! enforces entry-count and decompressed-size bounds because presentation
//! uploads are untrusted input.

use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Largest buffer reserved up front for a member. Declared sizes come from the
/// archive and are not trusted beyond this.
const INITIAL_PART_CAPACITY: u64 = 64 * 1024;

/// Bounds applied while inflating a package.
///
/// # Examples
///
/// ```rust
/// use slidetrack::ooxml::opc::PackageLimits;
///
/// let limits = PackageLimits::default().with_max_part_bytes(8 * 1024 * 1024);
/// assert_eq!(limits.max_part_bytes, 8 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PackageLimits {
    /// Maximum number of ZIP members
    pub max_entries: usize,
    /// Maximum decompressed size of a single member
    pub max_part_bytes: u64,
    /// Maximum decompressed size of the whole package
    pub max_total_bytes: u64,
}

impl Default for PackageLimits {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            max_part_bytes: 256 * 1024 * 1024,
            max_total_bytes: 1024 * 1024 * 1024,
        }
    }
}

impl PackageLimits {
    /// Set the maximum number of ZIP members.
    #[inline]
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Set the maximum decompressed size of a single member.
    #[inline]
    pub fn with_max_part_bytes(mut self, max: u64) -> Self {
        self.max_part_bytes = max;
        self
    }

    /// Set the maximum decompressed size of the whole package.
    #[inline]
    pub fn with_max_total_bytes(mut self, max: u64) -> Self {
        self.max_total_bytes = max;
        self
    }
}

/// Physical package reader that inflates a ZIP-based OPC package.
pub struct PhysPkgReader;

impl PhysPkgReader {
    /// Inflate every file member of the archive into a partname → bytes map.
    ///
    /// # Errors
    /// * `PackageCorrupt` if the buffer is not a readable ZIP archive or a
    ///   member cannot be inflated
    /// * `LimitExceeded` if any bound in `limits` is hit; the declared size is
    ///   checked first and the actual read is capped, so a lying header cannot
    ///   inflate past the bound
    pub fn read_all(data: &[u8], limits: &PackageLimits) -> Result<HashMap<PackURI, Vec<u8>>> {
        let mut archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| OpcError::PackageCorrupt(e.to_string()))?;

        if archive.len() > limits.max_entries {
            return Err(OpcError::LimitExceeded(format!(
                "{} entries exceeds the limit of {}",
                archive.len(),
                limits.max_entries
            )));
        }

        let mut parts = HashMap::with_capacity(archive.len());
        let mut total: u64 = 0;

        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| OpcError::PackageCorrupt(e.to_string()))?;
            if file.is_dir() {
                continue;
            }

            let name = file.name().to_string();
            if file.size() > limits.max_part_bytes {
                return Err(OpcError::LimitExceeded(format!(
                    "member '{}' declares {} bytes, limit is {}",
                    name,
                    file.size(),
                    limits.max_part_bytes
                )));
            }

            let remaining = limits.max_total_bytes.saturating_sub(total);
            let cap = limits.max_part_bytes.min(remaining);
            let mut blob = Vec::with_capacity(file.size().min(cap).min(INITIAL_PART_CAPACITY) as usize);
            (&mut file)
                .take(cap.saturating_add(1))
                .read_to_end(&mut blob)
                .map_err(|e| OpcError::PackageCorrupt(format!("member '{}': {}", name, e)))?;

            if blob.len() as u64 > cap {
                return Err(OpcError::LimitExceeded(format!(
                    "member '{}' inflates past the size limit",
                    name
                )));
            }
            total += blob.len() as u64;
            blob.shrink_to_fit();

            let partname = PackURI::from_membername(&name).map_err(OpcError::InvalidPackUri)?;
            parts.insert(partname, blob);
        }

        Ok(parts)
    }
}
