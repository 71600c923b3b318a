//! Response packaging
//!
//! A batch with exactly one converted item is returned as that image; any
//! larger batch becomes a single zip archive.

use std::collections::HashSet;
use std::path::Path;

use bytes::Bytes;
use pixpress_core::{BatchResult, ConvertedItem};
use pixpress_infra::archive::{create_zip_archive, ArchiveEntry};

pub const ARCHIVE_FILE_NAME: &str = "optimized_images.zip";
pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";

#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("nothing to package")]
    Empty,

    #[error("failed to build archive: {0}")]
    Archive(#[source] anyhow::Error),
}

/// The payload to send back, with its transfer metadata.
#[derive(Debug, Clone)]
pub enum Packaged {
    Single {
        data: Bytes,
        file_name: String,
        content_type: &'static str,
    },
    Archive {
        data: Bytes,
        file_name: &'static str,
    },
}

impl Packaged {
    pub fn data(&self) -> &Bytes {
        match self {
            Packaged::Single { data, .. } | Packaged::Archive { data, .. } => data,
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            Packaged::Single { file_name, .. } => file_name,
            Packaged::Archive { file_name, .. } => file_name,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Packaged::Single { content_type, .. } => content_type,
            Packaged::Archive { .. } => ARCHIVE_CONTENT_TYPE,
        }
    }

    pub fn into_data(self) -> Bytes {
        match self {
            Packaged::Single { data, .. } | Packaged::Archive { data, .. } => data,
        }
    }
}

/// Package a non-empty batch. `content_type` is the media type of the
/// converted items, used when the batch holds a single image.
pub fn package(result: BatchResult, content_type: &'static str) -> Result<Packaged, PackageError> {
    let mut items = result.items;

    match items.len() {
        0 => Err(PackageError::Empty),
        1 => {
            let ConvertedItem { name, data } = items.remove(0);
            Ok(Packaged::Single {
                data,
                file_name: name,
                content_type,
            })
        }
        count => {
            let entries = unique_entries(items);
            let data = create_zip_archive(entries).map_err(PackageError::Archive)?;
            tracing::debug!(
                entries = count,
                archive_bytes = data.len(),
                "Built zip archive"
            );
            Ok(Packaged::Archive {
                data: data.into(),
                file_name: ARCHIVE_FILE_NAME,
            })
        }
    }
}

/// Give every entry a distinct name. Later duplicates get a `-2`, `-3`, ...
/// suffix before the extension so no archive member is overwritten.
fn unique_entries(items: Vec<ConvertedItem>) -> Vec<ArchiveEntry> {
    let mut taken: HashSet<String> = HashSet::with_capacity(items.len());
    let mut entries = Vec::with_capacity(items.len());

    for item in items {
        let name = if taken.contains(&item.name) {
            let path = Path::new(&item.name);
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(item.name.as_str())
                .to_string();
            let extension = path.extension().and_then(|e| e.to_str()).map(str::to_string);

            (2..)
                .map(|n| match &extension {
                    Some(ext) => format!("{}-{}.{}", stem, n, ext),
                    None => format!("{}-{}", stem, n),
                })
                .find(|candidate| !taken.contains(candidate))
                .unwrap_or_else(|| item.name.clone())
        } else {
            item.name.clone()
        };

        taken.insert(name.clone());
        entries.push(ArchiveEntry {
            name,
            data: item.data,
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn converted(name: &str, data: &[u8]) -> ConvertedItem {
        ConvertedItem {
            name: name.to_string(),
            data: Bytes::copy_from_slice(data),
        }
    }

    fn batch(items: Vec<ConvertedItem>) -> BatchResult {
        BatchResult {
            items,
            skipped: Vec::new(),
        }
    }

    fn read_archive(data: &[u8]) -> Vec<(String, Vec<u8>)> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut content = Vec::new();
                file.read_to_end(&mut content).unwrap();
                (file.name().to_string(), content)
            })
            .collect()
    }

    #[test]
    fn test_empty_batch_is_an_error() {
        assert!(matches!(
            package(batch(Vec::new()), "image/webp"),
            Err(PackageError::Empty)
        ));
    }

    #[test]
    fn test_single_item_is_returned_as_is() {
        let packaged = package(batch(vec![converted("cat.webp", b"RIFFdata")]), "image/webp").unwrap();

        assert_eq!(packaged.content_type(), "image/webp");
        assert_eq!(packaged.file_name(), "cat.webp");
        assert_eq!(packaged.data().as_ref(), b"RIFFdata");
    }

    #[test]
    fn test_multiple_items_become_archive() {
        let packaged = package(
            batch(vec![converted("a.webp", b"one"), converted("b.webp", b"two")]),
            "image/webp",
        )
        .unwrap();

        assert_eq!(packaged.content_type(), ARCHIVE_CONTENT_TYPE);
        assert_eq!(packaged.file_name(), ARCHIVE_FILE_NAME);

        let entries = read_archive(packaged.data());
        assert_eq!(
            entries,
            vec![
                ("a.webp".to_string(), b"one".to_vec()),
                ("b.webp".to_string(), b"two".to_vec()),
            ]
        );
    }

    #[test]
    fn test_duplicate_names_are_made_unique() {
        let packaged = package(
            batch(vec![
                converted("photo.webp", b"1"),
                converted("photo.webp", b"2"),
                converted("photo-2.webp", b"3"),
                converted("photo.webp", b"4"),
            ]),
            "image/webp",
        )
        .unwrap();

        let names: Vec<_> = read_archive(packaged.data())
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            vec!["photo.webp", "photo-2.webp", "photo-2-2.webp", "photo-3.webp"]
        );
    }
}
