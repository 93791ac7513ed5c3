//! Loading raw input bytes.

use super::{parse_documents, Document};
use crate::error::{Error, Result};
use std::io::Read;

/// Loader supplies the raw bytes behind a location.
///
/// Remote retrieval is left to callers: implement this trait for whatever
/// transport is needed and hand it to the comparison functions.
pub trait Loader: Sync {
    fn load(&self, location: &str) -> Result<Vec<u8>>;
}

/// FileLoader reads local files. The location `-` reads standard input.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl Loader for FileLoader {
    fn load(&self, location: &str) -> Result<Vec<u8>> {
        if location == "-" {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| Error::load(location, e))?;
            return Ok(buf);
        }
        std::fs::read(location).map_err(|e| Error::load(location, e))
    }
}

/// Loads and parses all documents at `location`.
pub fn load_documents(loader: &dyn Loader, location: &str) -> Result<Vec<Document>> {
    let bytes = loader.load(location)?;
    Ok(parse_documents(location, &bytes)?)
}
