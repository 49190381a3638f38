use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use sharecart_core::traits::FileSystem;

/// [`FileSystem`] over `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir(path)
    }

    fn create_file(&self, path: &Path) -> io::Result<bool> {
        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>> {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn open_write(&self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        // Only the resolver creates files; the target must already be a regular file.
        if !path.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} could not be found", path.display()),
            ));
        }
        let file = OpenOptions::new().write(true).truncate(true).open(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn create_file_is_create_new() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("o_o.ini");
        assert!(OsFileSystem.create_file(&path).unwrap());
        assert!(!OsFileSystem.create_file(&path).unwrap());
        assert!(OsFileSystem.is_file(&path));
    }

    #[test]
    fn create_file_without_parent_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("o_o.ini");
        assert!(OsFileSystem.create_file(&path).is_err());
    }

    #[test]
    fn open_write_refuses_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("o_o.ini");
        let err = OsFileSystem.open_write(&path).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!path.exists());
    }

    #[test]
    fn open_write_refuses_directory() {
        let dir = TempDir::new().unwrap();
        assert!(OsFileSystem.open_write(dir.path()).is_err());
    }

    #[test]
    fn write_truncates_then_reads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("o_o.ini");
        std::fs::write(&path, "a much longer previous content").unwrap();

        {
            let mut out = OsFileSystem.open_write(&path).unwrap();
            out.write_all(b"short").unwrap();
            out.flush().unwrap();
        }

        let mut content = String::new();
        OsFileSystem
            .open_read(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "short");
    }

    #[test]
    fn remove_file_deletes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("o_o.ini");
        std::fs::write(&path, "").unwrap();
        OsFileSystem.remove_file(&path).unwrap();
        assert!(!OsFileSystem.exists(&path));
    }
}
