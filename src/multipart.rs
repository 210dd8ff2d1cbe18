//! multipart/form-data encoding for file uploads.
//!
//! Files are read fully into memory before the request is sent.

use crate::error::{Error, Result};
use bytes::{BufMut, Bytes, BytesMut};
use std::path::Path;

pub struct Multipart {
    boundary: String,
    buf: BytesMut,
}

impl Multipart {
    pub fn new() -> Self {
        Self::with_boundary(format!("{:032x}", rand::random::<u128>()))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            buf: BytesMut::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    fn open_part(&mut self) {
        if !self.buf.is_empty() {
            self.buf.put_slice(b"\r\n");
        }
        self.buf.put_slice(b"--");
        self.buf.put_slice(self.boundary.as_bytes());
        self.buf.put_slice(b"\r\n");
    }

    /// Add a part holding the contents of the file at `path`
    pub fn file(&mut self, name: &str, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = std::fs::read(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::debug!("Adding file part '{name}' from {} ({} bytes)", path.display(), contents.len());

        self.open_part();
        self.buf.put_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                escape_quotes(name),
                escape_quotes(&filename)
            )
            .as_bytes(),
        );
        self.buf.put_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        self.buf.put_slice(&contents);
        Ok(())
    }

    /// Add a plain text field
    pub fn field(&mut self, name: &str, value: &str) {
        self.open_part();
        self.buf.put_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                escape_quotes(name)
            )
            .as_bytes(),
        );
        self.buf.put_slice(value.as_bytes());
    }

    /// Write the closing delimiter and return the body
    pub fn finish(mut self) -> Bytes {
        if !self.buf.is_empty() {
            self.buf.put_slice(b"\r\n");
        }
        self.buf.put_slice(b"--");
        self.buf.put_slice(self.boundary.as_bytes());
        self.buf.put_slice(b"--\r\n");
        self.buf.freeze()
    }
}

impl Default for Multipart {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn fields_only_should_encode_in_order() {
        let mut form = Multipart::with_boundary("XYZ");
        form.field("a", "1");
        form.field("b", "2");
        let body = form.finish();

        let expected = "--XYZ\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n1\r\n\
                        --XYZ\r\nContent-Disposition: form-data; name=\"b\"\r\n\r\n2\r\n\
                        --XYZ--\r\n";
        assert_eq!(body, Bytes::from(expected));
    }

    #[test]
    fn file_part_should_carry_contents_and_filename() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello upload").unwrap();
        let filename = file.path().file_name().unwrap().to_string_lossy().into_owned();

        let mut form = Multipart::with_boundary("B");
        form.file("doc", file.path()).unwrap();
        let body = String::from_utf8(form.finish().to_vec()).unwrap();

        assert!(body.starts_with("--B\r\n"));
        assert!(body.contains(&format!(
            "Content-Disposition: form-data; name=\"doc\"; filename=\"{filename}\"\r\n"
        )));
        assert!(body.contains("Content-Type: application/octet-stream\r\n\r\nhello upload\r\n--B--\r\n"));
    }

    #[test]
    fn missing_file_should_report_path() {
        let mut form = Multipart::new();
        let err = form.file("doc", "/definitely/not/here.bin").unwrap_err();
        assert!(matches!(err, Error::ReadFile { path, .. } if path.ends_with("here.bin")));
    }

    #[test]
    fn names_should_escape_quotes() {
        let mut form = Multipart::with_boundary("B");
        form.field("a\"b", "v");
        let body = String::from_utf8(form.finish().to_vec()).unwrap();
        assert!(body.contains("name=\"a\\\"b\""));
    }

    #[test]
    fn random_boundary_should_be_in_content_type() {
        let form = Multipart::new();
        assert_eq!(form.boundary().len(), 32);
        assert_eq!(
            form.content_type(),
            format!("multipart/form-data; boundary={}", form.boundary())
        );
    }
}
