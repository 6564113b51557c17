//! Claim attachment encoding.
//!
//! # Design
//! A caller may hand over a file in one of four shapes: a path, an open
//! reader paired with the path it came from, raw bytes, or an already
//! base64-encoded string. `AttachmentInput` collects whatever was supplied
//! and `AttachmentInput::source` resolves it to exactly one
//! `AttachmentSource` using a fixed priority (path, reader, bytes, base64).
//! `encode_attachment` then produces the `{file_base64, file_name, file_type}` fields,
//! sniffing the MIME type from magic bytes where the caller did not give one.

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::RootError;
use crate::fields::Fields;

/// Used when magic-byte sniffing does not recognise the content.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Best-guess MIME type from file content.
pub trait MimeSniffer: Send + Sync {
    fn sniff(&self, bytes: &[u8]) -> Option<String>;
}

/// Magic-byte sniffing backed by the `infer` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct InferSniffer;

impl MimeSniffer for InferSniffer {
    fn sniff(&self, bytes: &[u8]) -> Option<String> {
        infer::get(bytes).map(|kind| kind.mime_type().to_string())
    }
}

/// Exactly one way of supplying file content.
pub enum AttachmentSource {
    Path(PathBuf),
    Reader {
        path: PathBuf,
        reader: Box<dyn Read + Send>,
    },
    Bytes {
        bytes: Vec<u8>,
        file_name: String,
        file_type: Option<String>,
    },
    Base64 {
        data: String,
        file_name: String,
        file_type: String,
    },
}

impl fmt::Debug for AttachmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            AttachmentSource::Reader { path, .. } => {
                f.debug_struct("Reader").field("path", path).finish_non_exhaustive()
            }
            AttachmentSource::Bytes {
                bytes,
                file_name,
                file_type,
            } => f
                .debug_struct("Bytes")
                .field("len", &bytes.len())
                .field("file_name", file_name)
                .field("file_type", file_type)
                .finish(),
            AttachmentSource::Base64 {
                data,
                file_name,
                file_type,
            } => f
                .debug_struct("Base64")
                .field("len", &data.len())
                .field("file_name", file_name)
                .field("file_type", file_type)
                .finish(),
        }
    }
}

/// Everything a caller may supply for an attachment, in any combination.
#[derive(Default)]
pub struct AttachmentInput {
    pub path: Option<PathBuf>,
    pub file: Option<(PathBuf, Box<dyn Read + Send>)>,
    pub bytes: Option<Vec<u8>>,
    pub base64: Option<String>,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
}

impl fmt::Debug for AttachmentInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachmentInput")
            .field("path", &self.path)
            .field("file", &self.file.as_ref().map(|(path, _)| path))
            .field("bytes", &self.bytes.as_ref().map(Vec::len))
            .field("base64", &self.base64.as_ref().map(String::len))
            .field("file_name", &self.file_name)
            .field("file_type", &self.file_type)
            .finish()
    }
}

impl AttachmentInput {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// An open reader; `path` supplies the file name.
    pub fn file(path: impl Into<PathBuf>, reader: impl Read + Send + 'static) -> Self {
        let reader: Box<dyn Read + Send> = Box::new(reader);
        Self {
            file: Some((path.into(), reader)),
            ..Self::default()
        }
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Some(bytes.into()),
            ..Self::default()
        }
    }

    pub fn base64(data: impl Into<String>) -> Self {
        Self {
            base64: Some(data.into()),
            ..Self::default()
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_file_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = Some(file_type.into());
        self
    }

    /// Pick the source by priority and check its companion fields.
    ///
    /// Returns `Ok(None)` when nothing was supplied, which is a
    /// description-only attachment.
    pub fn source(self) -> Result<Option<AttachmentSource>, RootError> {
        let AttachmentInput {
            path,
            file,
            bytes,
            base64,
            file_name,
            file_type,
        } = self;

        if let Some(path) = path {
            return Ok(Some(AttachmentSource::Path(path)));
        }
        if let Some((path, reader)) = file {
            return Ok(Some(AttachmentSource::Reader { path, reader }));
        }
        if let Some(bytes) = bytes {
            let file_name = file_name
                .ok_or_else(|| RootError::invalid("file_name is required when supplying bytes"))?;
            return Ok(Some(AttachmentSource::Bytes {
                bytes,
                file_name,
                file_type,
            }));
        }
        if let Some(data) = base64 {
            let file_name = file_name
                .ok_or_else(|| RootError::invalid("file_name is required when supplying base64"))?;
            let file_type = file_type
                .ok_or_else(|| RootError::invalid("file_type is required when supplying base64"))?;
            return Ok(Some(AttachmentSource::Base64 {
                data,
                file_name,
                file_type,
            }));
        }
        Ok(None)
    }
}

/// The wire form of an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttachmentDescriptor {
    pub file_base64: Option<String>,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
    pub description: String,
}

impl AttachmentDescriptor {
    /// File fields first, `description` last so nothing overwrites it.
    pub fn into_fields(self) -> Fields {
        Fields::new()
            .optional("file_base64", self.file_base64)
            .optional("file_name", self.file_name)
            .optional("file_type", self.file_type)
            .merge(Fields::new().field("description", self.description))
    }
}

/// Encode `input` into a descriptor carrying `description`.
pub fn encode_attachment(
    input: AttachmentInput,
    description: &str,
    sniffer: &dyn MimeSniffer,
) -> Result<AttachmentDescriptor, RootError> {
    let mut descriptor = match input.source()? {
        Some(source) => encode_source(source, sniffer)?,
        None => AttachmentDescriptor::default(),
    };
    descriptor.description = description.to_string();
    Ok(descriptor)
}

fn encode_source(
    source: AttachmentSource,
    sniffer: &dyn MimeSniffer,
) -> Result<AttachmentDescriptor, RootError> {
    let (bytes_b64, file_name, file_type) = match source {
        AttachmentSource::Path(path) => {
            let bytes = fs::read(&path)?;
            (STANDARD.encode(&bytes), base_name(&path)?, sniff(sniffer, &bytes))
        }
        AttachmentSource::Reader { path, mut reader } => {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes)?;
            (STANDARD.encode(&bytes), base_name(&path)?, sniff(sniffer, &bytes))
        }
        AttachmentSource::Bytes {
            bytes,
            file_name,
            file_type,
        } => {
            let file_type = file_type.unwrap_or_else(|| sniff(sniffer, &bytes));
            (STANDARD.encode(&bytes), file_name, file_type)
        }
        // Already encoded: passed through untouched, no sniffing.
        AttachmentSource::Base64 {
            data,
            file_name,
            file_type,
        } => (data, file_name, file_type),
    };
    Ok(AttachmentDescriptor {
        file_base64: Some(bytes_b64),
        file_name: Some(file_name),
        file_type: Some(file_type),
        description: String::new(),
    })
}

fn sniff(sniffer: &dyn MimeSniffer, bytes: &[u8]) -> String {
    sniffer
        .sniff(bytes)
        .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string())
}

fn base_name(path: &Path) -> Result<String, RootError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            RootError::invalid(format!("cannot derive file_name from {}", path.display()))
        })
}
