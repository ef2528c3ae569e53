//! Where filled documents are written: a zip archive or a directory.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use formfill::{FormError, MemorySink, OutputSink};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Default archive name: `filled_forms_<YYYYmmdd_HHMMSS>.zip`.
pub fn default_archive_name<Tz>(now: &chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("filled_forms_{}.zip", now.format("%Y%m%d_%H%M%S"))
}

/// Archive entry or file name for an output name: `filled_form_<name>.pdf`.
pub fn entry_name(output_name: &str) -> String {
    format!("filled_form_{}.pdf", sanitize(output_name))
}

/// Replace path separators and control characters so a row value cannot
/// escape the archive or directory.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if cleaned.chars().all(|c| c == '.') {
        cleaned.replace('.', "_")
    } else {
        cleaned
    }
}

/// Where the batch outputs go.
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    Zip(PathBuf),
    Directory(PathBuf),
}

impl Destination {
    /// Directory when `output` is an existing directory or ends with a path
    /// separator; otherwise a zip file (timestamped name when `output` is `None`).
    pub fn resolve(output: Option<&Path>) -> Self {
        match output {
            None => Destination::Zip(PathBuf::from(default_archive_name(&chrono::Local::now()))),
            Some(path) => {
                let text = path.to_string_lossy();
                if path.is_dir() || text.ends_with('/') || text.ends_with(std::path::MAIN_SEPARATOR) {
                    Destination::Directory(path.to_path_buf())
                } else {
                    Destination::Zip(path.to_path_buf())
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Destination::Zip(path) | Destination::Directory(path) => path,
        }
    }
}

/// Collects entries in memory and writes them as one deflated zip on
/// [`ZipSink::finish`]. A repeated name keeps the last bytes written.
pub struct ZipSink {
    path: PathBuf,
    entries: MemorySink,
}

impl ZipSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: MemorySink::new(),
        }
    }

    /// Write the archive, returning the number of entries.
    pub fn finish(self) -> Result<usize, FormError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let entries = self.entries.into_entries();
        let count = entries.len();
        for (name, bytes) in entries {
            zip.start_file(name.as_str(), options).map_err(zip_error)?;
            zip.write_all(&bytes)?;
        }
        zip.finish().map_err(zip_error)?;
        Ok(count)
    }
}

impl OutputSink for ZipSink {
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<(), FormError> {
        self.entries.write(name, bytes)
    }
}

fn zip_error(err: zip::result::ZipError) -> FormError {
    FormError::Io(format!("zip archive: {err}"))
}

/// Writes each entry as a file in a directory, overwriting existing files.
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, FormError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
}

impl OutputSink for DirSink {
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<(), FormError> {
        fs::write(self.dir.join(name), bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn archive_name_is_timestamped() {
        let at = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(default_archive_name(&at), "filled_forms_20240309_070501.zip");
    }

    #[test]
    fn entry_names() {
        assert_eq!(entry_name("A100"), "filled_form_A100.pdf");
        assert_eq!(entry_name("3"), "filled_form_3.pdf");
    }

    #[test]
    fn entry_names_cannot_escape() {
        assert_eq!(entry_name("../etc/passwd"), "filled_form_.._etc_passwd.pdf");
        assert_eq!(entry_name("a\\b"), "filled_form_a_b.pdf");
        assert_eq!(entry_name(".."), "filled_form___.pdf");
        assert_eq!(entry_name("x\ny"), "filled_form_x_y.pdf");
    }

    #[test]
    fn destination_resolution() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            Destination::resolve(Some(dir.path())),
            Destination::Directory(dir.path().to_path_buf())
        );
        assert_eq!(
            Destination::resolve(Some(Path::new("out/"))),
            Destination::Directory(PathBuf::from("out/"))
        );
        assert_eq!(
            Destination::resolve(Some(Path::new("out.zip"))),
            Destination::Zip(PathBuf::from("out.zip"))
        );
        match Destination::resolve(None) {
            Destination::Zip(path) => {
                let name = path.to_string_lossy().into_owned();
                assert!(name.starts_with("filled_forms_") && name.ends_with(".zip"));
            }
            other => panic!("expected zip, got {other:?}"),
        }
    }

    #[test]
    fn zip_sink_keeps_last_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.zip");
        let mut sink = ZipSink::new(&path);
        sink.write("a.pdf", b"first").unwrap();
        sink.write("b.pdf", b"other").unwrap();
        sink.write("a.pdf", b"second").unwrap();
        assert_eq!(sink.finish().unwrap(), 2);

        let mut archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        let mut content = String::new();
        std::io::Read::read_to_string(&mut archive.by_name("a.pdf").unwrap(), &mut content)
            .unwrap();
        assert_eq!(content, "second");
    }

    #[test]
    fn dir_sink_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirSink::create(dir.path().join("pdfs")).unwrap();
        sink.write("filled_form_1.pdf", b"%PDF").unwrap();
        assert_eq!(
            fs::read(dir.path().join("pdfs").join("filled_form_1.pdf")).unwrap(),
            b"%PDF"
        );
    }
}
