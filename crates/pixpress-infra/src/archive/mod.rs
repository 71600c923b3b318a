//! Zip archive creation for multi-image responses.

use anyhow::{Context, Result};
use bytes::Bytes;
use std::io::Write;
use std::path::Path;

/// One member of an archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub name: String,
    pub data: Bytes,
}

/// Sanitize filename for archive entry to prevent path traversal.
/// Extracts only the base name (strips path components like `../`).
fn sanitize_archive_filename(filename: &str, fallback: &str) -> String {
    Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .unwrap_or(fallback)
        .to_string()
}

/// Build a deflated ZIP archive in memory. Entries keep their input order.
pub fn create_zip_archive(entries: Vec<ArchiveEntry>) -> Result<Vec<u8>> {
    use zip::write::{FileOptions, ZipWriter};
    use zip::CompressionMethod;

    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(std::io::Cursor::new(&mut buffer));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        for (index, entry) in entries.into_iter().enumerate() {
            let safe_filename =
                sanitize_archive_filename(&entry.name, &format!("unnamed_{}", index + 1));

            zip.start_file(safe_filename.as_str(), options)
                .with_context(|| format!("Failed to add file to ZIP: {}", safe_filename))?;
            zip.write_all(&entry.data)
                .with_context(|| format!("Failed to write file data to ZIP: {}", safe_filename))?;
        }

        zip.finish().context("Failed to finalize ZIP archive")?;
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn entry(name: &str, data: &'static [u8]) -> ArchiveEntry {
        ArchiveEntry {
            name: name.to_string(),
            data: Bytes::from_static(data),
        }
    }

    #[test]
    fn test_sanitize_archive_filename() {
        assert_eq!(
            sanitize_archive_filename("../../etc/passwd", "fallback"),
            "passwd"
        );
        assert_eq!(sanitize_archive_filename("cat.webp", "fallback"), "cat.webp");
        assert_eq!(sanitize_archive_filename("", "fallback"), "fallback");
        assert_eq!(sanitize_archive_filename("..", "fallback"), "fallback");
    }

    #[test]
    fn test_create_zip_archive_round_trips_entries() {
        let data = create_zip_archive(vec![
            entry("a.webp", b"first"),
            entry("nested/b.webp", b"second"),
        ])
        .unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "a.webp");
        assert_eq!(first.compression(), zip::CompressionMethod::Deflated);
        let mut content = String::new();
        first.read_to_string(&mut content).unwrap();
        assert_eq!(content, "first");
        drop(first);

        let second = archive.by_index(1).unwrap();
        assert_eq!(second.name(), "b.webp");
    }

    #[test]
    fn test_create_zip_archive_empty() {
        let data = create_zip_archive(Vec::new()).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
