//! Source locations.
//!
//! The analysis only ever reports a (file, line) pair, so a span is just that
//! pair. File names are kept once in [`SourceFiles`].

use std::fmt;

/// Index of a source file registered in [`SourceFiles`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct FileId(u32);

impl FileId {
    /// File of synthesized nodes.
    pub const UNKNOWN: FileId = FileId(u32::MAX);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        FileId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::UNKNOWN {
            write!(f, "FileId(?)")
        } else {
            write!(f, "FileId({})", self.0)
        }
    }
}

/// Location of a node: the file it came from and its 1-based line.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub file: FileId,
    pub line: u32,
}

impl Span {
    /// Span for compiler-generated nodes with no source position.
    pub const DUMMY: Span = Span {
        file: FileId::UNKNOWN,
        line: 0,
    };

    #[inline]
    pub const fn new(file: FileId, line: u32) -> Self {
        Span { file, line }
    }

    #[inline]
    pub const fn is_dummy(self) -> bool {
        self.line == 0
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::DUMMY
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.file, self.line)
    }
}

/// Names of the files that contributed nodes to the program.
#[derive(Clone, Debug, Default)]
pub struct SourceFiles {
    names: Vec<String>,
}

impl SourceFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file and return its id. Registering the same name twice
    /// returns the existing id.
    pub fn add(&mut self, name: impl Into<String>) -> FileId {
        let name = name.into();
        if let Some(pos) = self.names.iter().position(|n| *n == name) {
            return FileId(Self::to_raw(pos));
        }
        self.names.push(name);
        FileId(Self::to_raw(self.names.len() - 1))
    }

    /// Display name for `file`; generated spans render as `<generated>`.
    pub fn name(&self, file: FileId) -> &str {
        self.names
            .get(file.0 as usize)
            .map_or("<generated>", String::as_str)
    }

    #[inline]
    fn to_raw(pos: usize) -> u32 {
        u32::try_from(pos).unwrap_or_else(|_| panic!("more than u32::MAX source files"))
    }
}
