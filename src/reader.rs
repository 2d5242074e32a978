use crate::buffer::ByteStream;
use crate::encode::Encoding;
use crate::error::{FnaError, Result, Status};
use crate::format::{is_gzip_path, FormatKind, SNIFF_LEN};
use crate::layout::Margins;
use crate::parser::{Driver, FormatDriver, Options, Settings};
use crate::record::Record;
use flate2::read::MultiGzDecoder;
use log::debug;
use memmap2::MmapOptions;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

/// Parameters fixed when a session is opened. Every field is optional in
/// serialized form; margins are rounded up to 16 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionParams {
    /// Detected from the extension, then the content, when unset.
    pub format: Option<FormatKind>,
    pub encoding: Encoding,
    pub options: Options,
    pub head_margin: usize,
    pub tail_margin: usize,
    pub seq_head_margin: usize,
    pub seq_tail_margin: usize,
}

impl SessionParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(mut self, format: FormatKind) -> Self {
        self.format = Some(format);
        self
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn head_margin(mut self, size: usize) -> Self {
        self.head_margin = size;
        self
    }

    pub fn tail_margin(mut self, size: usize) -> Self {
        self.tail_margin = size;
        self
    }

    pub fn seq_head_margin(mut self, size: usize) -> Self {
        self.seq_head_margin = size;
        self
    }

    pub fn seq_tail_margin(mut self, size: usize) -> Self {
        self.seq_tail_margin = size;
        self
    }

    pub fn margins(&self) -> Margins {
        Margins::new(
            self.head_margin,
            self.tail_margin,
            self.seq_head_margin,
            self.seq_tail_margin,
        )
    }
}

/// One open input: the byte stream, the driver bound to its format and the
/// status of the last call.
///
/// Only one record is under construction at a time. Once the input is
/// exhausted or an error occurs, every later `read` repeats that outcome.
pub struct Session<R: Read> {
    stream: Option<ByteStream<R>>,
    driver: Driver,
    settings: Settings,
    status: Status,
    error: Option<FnaError>,
    path: Option<PathBuf>,
}

impl Session<Box<dyn Read + Send>> {
    /// Opens a file, decompressing `.gz` inputs and memory-mapping the rest.
    pub fn open<P: AsRef<Path>>(path: P, params: SessionParams) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let reader: Box<dyn Read + Send> = if is_gzip_path(path) {
            Box::new(MultiGzDecoder::new(BufReader::new(file)))
        } else if file.metadata()?.len() == 0 {
            // empty files cannot be mapped
            Box::new(file)
        } else {
            let mmap = unsafe { MmapOptions::new().map(&file)? };
            Box::new(Cursor::new(mmap))
        };

        let format = params.format.or_else(|| {
            let guess = FormatKind::from_path(path);
            if let Some(format) = guess {
                debug!("{} format from the extension of {}", format, path.display());
            }
            guess
        });

        let mut session = Session::start(reader, params, format)?;
        session.path = Some(path.to_path_buf());
        Ok(session)
    }
}

impl<R: Read> Session<R> {
    /// Wraps an already open byte source.
    pub fn from_reader(reader: R, params: SessionParams) -> Result<Self> {
        Session::start(reader, params, params.format)
    }

    fn start(reader: R, params: SessionParams, format: Option<FormatKind>) -> Result<Self> {
        let mut stream = ByteStream::new(reader);
        let format = match format {
            Some(format) => format,
            None => {
                let format = FormatKind::sniff(stream.peek(SNIFF_LEN)?)
                    .ok_or(FnaError::UnknownFormat)?;
                debug!("{} format from content", format);
                format
            }
        };

        let mut driver = Driver::for_format(format)?;
        driver.read_header(&mut stream)?;

        Ok(Session {
            stream: Some(stream),
            driver,
            settings: Settings::new(params.encoding, params.margins(), params.options),
            status: Status::Success,
            error: None,
            path: None,
        })
    }

    /// Reads the next record. `Ok(None)` means the input is exhausted and
    /// the status is [`Status::Eof`].
    pub fn read(&mut self) -> Result<Option<Record>> {
        if let Some(err) = &self.error {
            return Err(err.replay());
        }
        let stream = match self.stream.as_mut() {
            Some(stream) if self.status != Status::Eof => stream,
            _ => {
                self.status = Status::Eof;
                return Ok(None);
            }
        };

        match self.driver.read_record(stream, &self.settings) {
            Ok(Some(record)) => {
                self.status = Status::Success;
                Ok(Some(record))
            }
            Ok(None) => {
                self.status = Status::Eof;
                Ok(None)
            }
            Err(e) => {
                self.status = Status::from(&e);
                self.error = Some(e.replay());
                Err(e)
            }
        }
    }

    /// Releases the byte stream. Later reads report end of input.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            debug!("closed {} session", self.format());
        }
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    #[inline]
    pub fn format(&self) -> FormatKind {
        self.driver.format()
    }

    #[inline]
    pub fn encoding(&self) -> Encoding {
        self.settings.encoding
    }

    #[inline]
    pub fn margins(&self) -> Margins {
        self.settings.margins
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl<R: Read> Iterator for Session<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.error.is_some() {
            return None;
        }
        self.read().transpose()
    }
}
