//! Zip-backed enumeration shared by `.jmod` (JDK modules) and `.jar`
//! (classpath) scanning — both are "a zip with `.class` entries under some
//! path prefix", just with a different prefix and container-file framing.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use zip::ZipArchive;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("failed to open archive {path}: {source}")]
    Open { path: std::path::PathBuf, source: std::io::Error },
    #[error("not a valid zip archive: {path}: {source}")]
    Zip { path: std::path::PathBuf, source: zip::result::ZipError },
}

pub fn open_zip(path: &Path) -> Result<ZipArchive<File>, ArchiveError> {
    let file = File::open(path).map_err(|source| ArchiveError::Open { path: path.to_path_buf(), source })?;
    ZipArchive::new(file).map_err(|source| ArchiveError::Zip { path: path.to_path_buf(), source })
}

/// Binary names (`java/lang/String`, not `java.lang.String`) of every
/// `.class` entry under `prefix` — `module-info.class` is excluded, since
/// it describes the module rather than naming a type.
pub fn class_internal_names(archive: &mut ZipArchive<File>, prefix: &str) -> Vec<String> {
    let mut names = Vec::new();
    for i in 0..archive.len() {
        let Ok(entry) = archive.by_index(i) else { continue };
        if entry.is_dir() {
            continue;
        }
        let Some(rest) = entry.name().strip_prefix(prefix) else { continue };
        let Some(internal) = rest.strip_suffix(".class") else { continue };
        if internal == "module-info" || internal.is_empty() {
            continue;
        }
        names.push(internal.to_string());
    }
    names
}

pub fn read_entry(archive: &mut ZipArchive<File>, entry_name: &str) -> std::io::Result<Option<Vec<u8>>> {
    let mut entry = match archive.by_name(entry_name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, err)),
    };
    let mut buf = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut buf)?;
    Ok(Some(buf))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    pub fn write_zip(path: &std::path::Path, entries: &[(&str, &[u8])]) {
        let file = std::fs::File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, contents) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(contents).unwrap();
        }
        zip.finish().unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::write_zip;
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn lists_class_entries_under_prefix_and_skips_module_info() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("java.base.jmod");
        write_zip(
            &path,
            &[
                ("classes/java/lang/String.class", b"stub"),
                ("classes/java/lang/Object.class", b"stub"),
                ("classes/module-info.class", b"stub"),
                ("classes/java/lang/", b""),
            ],
        );

        let mut archive = open_zip(&path).unwrap();
        let mut names = class_internal_names(&mut archive, "classes/");
        names.sort();
        assert_eq!(names, vec!["java/lang/Object", "java/lang/String"]);
    }

    #[test]
    fn reads_entry_bytes_by_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.jar");
        write_zip(&path, &[("com/example/Widget.class", b"\xCA\xFE\xBA\xBE")]);

        let mut archive = open_zip(&path).unwrap();
        let bytes = read_entry(&mut archive, "com/example/Widget.class").unwrap().unwrap();
        assert_eq!(bytes, b"\xCA\xFE\xBA\xBE");
        assert!(read_entry(&mut archive, "missing.class").unwrap().is_none());
    }
}
