use crate::brochures::BrochureError;
use std::collections::HashSet;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// `name`, or `<stem>_<k><ext>` for the first `k` not already taken.
fn unique_name(name: &str, used: &mut HashSet<String>) -> String {
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut candidate = name.to_string();
    let mut k = 1;
    while used.contains(&candidate) {
        candidate = format!("{stem}_{k}{ext}");
        k += 1;
    }
    used.insert(candidate.clone());
    candidate
}

/// Deflated in-memory zip of `paths`, each stored under its file name.
pub fn zip_files(paths: &[PathBuf]) -> Result<Vec<u8>, BrochureError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut used = HashSet::new();

    for path in paths {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "details.pdf".to_string());
        let arcname = unique_name(&file_name, &mut used);

        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        writer.start_file(arcname, options)?;
        writer.write_all(&fs::read(path)?)?;
    }

    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn duplicate_names_get_a_suffix() {
        let mut used = HashSet::new();
        assert_eq!(unique_name("wood.pdf", &mut used), "wood.pdf");
        assert_eq!(unique_name("wood.pdf", &mut used), "wood_1.pdf");
        assert_eq!(unique_name("wood.pdf", &mut used), "wood_2.pdf");
        assert_eq!(unique_name("other.pdf", &mut used), "other.pdf");
    }

    #[test]
    fn zips_every_file() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let first = a.path().join("wood.pdf");
        let second = b.path().join("wood.pdf");
        fs::write(&first, b"first").unwrap();
        fs::write(&second, b"second").unwrap();

        let bytes = zip_files(&[first, second]).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut body = String::new();
        archive
            .by_name("wood_1.pdf")
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "second");
    }
}
