//! Compression-aware file access
//!
//! Opens paths for reading, writing or appending, choosing a gzip or bzip2
//! codec from the file suffix. The `-` sentinel stands for the standard
//! stream matching the mode.

use bzip2::read::MultiBzDecoder;
use bzip2::write::BzEncoder;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use std::convert::Infallible;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Where a stream comes from or goes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Standard input or output, depending on the mode
    Std,
    Path(PathBuf),
}

impl Target {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Target::Std => None,
            Target::Path(path) => Some(path),
        }
    }

    pub fn compression(&self) -> Compression {
        match self {
            Target::Std => Compression::None,
            Target::Path(path) => Compression::from_path(path),
        }
    }
}

impl FromStr for Target {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" { Ok(Target::Std) } else { Ok(Target::Path(PathBuf::from(s))) }
    }
}

impl From<&Path> for Target {
    fn from(path: &Path) -> Self {
        Target::Path(path.to_path_buf())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Std => write!(f, "-"),
            Target::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// How a target is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
    Append,
}

impl Mode {
    pub fn is_read(self) -> bool {
        self == Mode::Read
    }
}

impl FromStr for Mode {
    type Err = String;

    /// Accepts `open()`-style mode strings such as `r`, `rt`, `wb` or `a`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains('r') {
            Ok(Mode::Read)
        } else if s.contains('a') {
            Ok(Mode::Append)
        } else if s.contains('w') {
            Ok(Mode::Write)
        } else {
            Err(format!("invalid mode: '{s}'"))
        }
    }
}

/// Codec selected by file suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
}

impl Compression {
    pub fn from_path(path: &Path) -> Self {
        let name = path.to_string_lossy();
        if name.ends_with(".bz2") {
            Compression::Bzip2
        } else if name.ends_with(".gz") {
            Compression::Gzip
        } else {
            Compression::None
        }
    }
}

/// A readable stream
pub enum Input {
    Stdin(io::Stdin),
    Plain(File),
    Gzip(MultiGzDecoder<File>),
    Bzip2(MultiBzDecoder<File>),
}

impl Input {
    pub fn open(target: &Target) -> io::Result<Self> {
        let Target::Path(path) = target else {
            return Ok(Input::Stdin(io::stdin()));
        };
        let file = File::open(path)?;
        Ok(match Compression::from_path(path) {
            Compression::None => Input::Plain(file),
            Compression::Gzip => Input::Gzip(MultiGzDecoder::new(file)),
            Compression::Bzip2 => Input::Bzip2(MultiBzDecoder::new(file)),
        })
    }
}

impl Read for Input {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Input::Stdin(r) => r.read(buf),
            Input::Plain(r) => r.read(buf),
            Input::Gzip(r) => r.read(buf),
            Input::Bzip2(r) => r.read(buf),
        }
    }
}

/// A writable stream
///
/// Compressed variants need [`Output::finish`] to write their trailer.
/// Dropping one finishes it too, but swallows any error.
pub enum Output {
    Stdout(io::Stdout),
    Plain(BufWriter<File>),
    Gzip(GzEncoder<File>),
    Bzip2(BzEncoder<File>),
}

impl Output {
    /// Open `target` for writing; `mode` picks truncate or append.
    pub fn open(target: &Target, mode: Mode) -> io::Result<Self> {
        if mode.is_read() {
            let message = format!("{target} cannot be written in read mode");
            return Err(io::Error::new(io::ErrorKind::InvalidInput, message));
        }
        let Target::Path(path) = target else {
            return Ok(Output::Stdout(io::stdout()));
        };
        let file = match mode {
            Mode::Append => OpenOptions::new().create(true).append(true).open(path)?,
            _ => File::create(path)?,
        };
        Ok(match Compression::from_path(path) {
            Compression::None => Output::Plain(BufWriter::new(file)),
            Compression::Gzip => Output::Gzip(GzEncoder::new(file, flate2::Compression::default())),
            Compression::Bzip2 => Output::Bzip2(BzEncoder::new(file, bzip2::Compression::default())),
        })
    }

    /// Flush buffers and write compression trailers.
    pub fn finish(self) -> io::Result<()> {
        match self {
            Output::Stdout(mut w) => w.flush(),
            Output::Plain(mut w) => w.flush(),
            Output::Gzip(w) => w.finish()?.flush(),
            Output::Bzip2(w) => w.finish()?.flush(),
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(w) => w.write(buf),
            Output::Plain(w) => w.write(buf),
            Output::Gzip(w) => w.write(buf),
            Output::Bzip2(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(w) => w.flush(),
            Output::Plain(w) => w.flush(),
            Output::Gzip(w) => w.flush(),
            Output::Bzip2(w) => w.flush(),
        }
    }
}

/// Either side of an opened target
pub enum Stream {
    Read(Input),
    Write(Output),
}

impl Stream {
    pub fn into_input(self) -> Option<Input> {
        match self {
            Stream::Read(input) => Some(input),
            Stream::Write(_) => None,
        }
    }

    pub fn into_output(self) -> Option<Output> {
        match self {
            Stream::Write(output) => Some(output),
            Stream::Read(_) => None,
        }
    }
}

/// Open `target` in `mode`, propagating filesystem errors unchanged.
pub fn open(target: &Target, mode: Mode) -> io::Result<Stream> {
    if mode.is_read() {
        Input::open(target).map(Stream::Read)
    } else {
        Output::open(target, mode).map(Stream::Write)
    }
}

/// Factory for openers bound to one mode.
pub fn opener(mode: Mode) -> impl Fn(&Target) -> io::Result<Stream> {
    move |target: &Target| open(target, mode)
}
