// ABOUTME: File and stream helpers built on top of the substitution engine
// ABOUTME: Reads whole inputs with a sized buffer, decodes them and substitutes per file or per line

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use super::engine::TemplateEngine;
use super::error::{Result, TemplateError};

/// Text encoding used when reading template files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Strict UTF-8; invalid input is an error
    #[default]
    Utf8,
    /// UTF-8 with invalid sequences replaced by U+FFFD
    Utf8Lossy,
}

impl Encoding {
    pub fn decode(&self, bytes: Vec<u8>) -> Result<String> {
        match self {
            Encoding::Utf8 => {
                String::from_utf8(bytes).map_err(|e| TemplateError::DecodeError {
                    encoding: self.to_string(),
                    message: e.to_string(),
                })
            }
            Encoding::Utf8Lossy => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        }
    }
}

impl FromStr for Encoding {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "utf-8-lossy" | "utf8-lossy" => Ok(Encoding::Utf8Lossy),
            other => Err(TemplateError::UnsupportedEncoding(other.to_string())),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Utf8 => write!(f, "utf-8"),
            Encoding::Utf8Lossy => write!(f, "utf-8-lossy"),
        }
    }
}

impl TemplateEngine {
    /// Read any source to the end and substitute the decoded text
    pub fn substitute_reader<R: Read>(&self, reader: R) -> Result<String> {
        let content = self.read_to_string(reader)?;
        Ok(self.substitute(&content)?)
    }

    /// Substitute the whole contents of a file
    pub fn substitute_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let content = self.read_file(path.as_ref())?;
        Ok(self.substitute(&content)?)
    }

    /// Substitute a file line by line, handing each result to `sink`.
    ///
    /// Lines are split on `\n` only, so a trailing newline produces a final
    /// empty line.
    pub fn substitute_lines<F>(&self, path: impl AsRef<Path>, mut sink: F) -> Result<()>
    where
        F: FnMut(String) -> Result<()>,
    {
        let content = self.read_file(path.as_ref())?;

        for line in content.split('\n') {
            sink(self.substitute(line)?)?;
        }

        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            if self.options().debug {
                debug!("Could not find file '{}'", path.display());
            }
            return Err(TemplateError::FileNotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        self.read_to_string(file)
    }

    fn read_to_string<R: Read>(&self, reader: R) -> Result<String> {
        let options = self.options();
        let mut reader = BufReader::with_capacity(options.buffer_size.max(1), reader);
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        options.encoding.decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::EngineOptions;
    use std::fs;
    use tempfile::tempdir;

    fn engine() -> TemplateEngine {
        let mut engine = TemplateEngine::new().unwrap();
        engine.register_variable("who", "world").unwrap();
        engine
    }

    #[test]
    fn test_encoding_parsing() {
        assert_eq!("UTF-8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert_eq!("utf8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert_eq!("utf_8_lossy".parse::<Encoding>().unwrap(), Encoding::Utf8Lossy);
        assert!(matches!(
            "latin-1".parse::<Encoding>(),
            Err(TemplateError::UnsupportedEncoding(_))
        ));
    }

    #[test]
    fn test_decode() {
        let invalid = vec![b'a', 0xff, b'b'];

        assert!(matches!(
            Encoding::Utf8.decode(invalid.clone()),
            Err(TemplateError::DecodeError { .. })
        ));
        assert_eq!(Encoding::Utf8Lossy.decode(invalid).unwrap(), "a\u{FFFD}b");
    }

    #[test]
    fn test_substitute_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("greeting.txt");
        fs::write(&path, "Hello <<who>>!\n").unwrap();

        let output = engine().substitute_file(&path).unwrap();
        assert_eq!(output, "Hello world!\n");
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("missing.txt");

        let result = engine().substitute_file(&path);
        assert!(matches!(result, Err(TemplateError::FileNotFound(p)) if p == path));

        let result = engine().substitute_lines(temp_dir.path(), |_| Ok(()));
        assert!(matches!(result, Err(TemplateError::FileNotFound(_))));
    }

    #[test]
    fn test_substitute_lines() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("lines.txt");
        fs::write(&path, "a <<who>>\nb <<$who>>\n").unwrap();

        let mut lines = Vec::new();
        engine()
            .substitute_lines(&path, |line| {
                lines.push(line);
                Ok(())
            })
            .unwrap();

        assert_eq!(lines, vec!["a world", "b world", ""]);
    }

    #[test]
    fn test_small_buffer_reads_everything() {
        let options = EngineOptions {
            buffer_size: 2,
            ..EngineOptions::default()
        };
        let mut engine = TemplateEngine::with_options(options).unwrap();
        engine.register_variable("who", "world").unwrap();

        let output = engine
            .substitute_reader("long enough <<who>> text".as_bytes())
            .unwrap();
        assert_eq!(output, "long enough world text");
    }
}
