use serde::Serialize;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;

use crate::common::errors::{FlingError, Result};

/// One entry of an existing archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveEntry {
    pub name: String,
    pub size: u64,
    pub compressed_size: u64,
    pub method: String,
}

/// List the entries of a zip file on disk
pub fn list_entries(path: &Path) -> Result<Vec<ArchiveEntry>> {
    let file = File::open(path).map_err(|source| FlingError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    entries_of(file)
}

/// List the entries of an in-memory zip
pub fn read_entries(bytes: &[u8]) -> Result<Vec<ArchiveEntry>> {
    entries_of(std::io::Cursor::new(bytes))
}

fn entries_of<R: Read + Seek>(reader: R) -> Result<Vec<ArchiveEntry>> {
    let mut archive = ZipArchive::new(reader)?;
    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        entries.push(ArchiveEntry {
            name: entry.name().to_string(),
            size: entry.size(),
            compressed_size: entry.compressed_size(),
            method: format!("{:?}", entry.compression()),
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    fn sample_zip() -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file("notes.txt", options).unwrap();
        zip.write_all(&b"la ".repeat(200)).unwrap();
        zip.start_file("raw.bin", options.compression_method(CompressionMethod::Stored))
            .unwrap();
        zip.write_all(&[7u8; 10]).unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_read_entries() {
        let entries = read_entries(&sample_zip()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "notes.txt");
        assert_eq!(entries[0].size, 600);
        assert!(entries[0].compressed_size < 600);
        assert_eq!(entries[0].method, "Deflated");
        assert_eq!(entries[1].name, "raw.bin");
        assert_eq!(entries[1].method, "Stored");
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            read_entries(b"definitely not a zip"),
            Err(FlingError::Zip(_))
        ));
    }
}
