use jardiff_common::{JarDiffError, Result, SideTag};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;
use walkdir::WalkDir;
use zip::ZipArchive;

type SharedArchive = Rc<RefCell<ZipArchive<File>>>;

/// One side of the comparison: a JAR archive or a directory tree.
///
/// Archive handles are opened here and live until [`DiffSource::close`]; the
/// orchestrator owns both sides and releases them on every exit path.
pub enum DiffSource {
    Jar {
        tag: SideTag,
        path: PathBuf,
        archive: SharedArchive,
    },
    Directory {
        tag: SideTag,
        path: PathBuf,
    },
}

impl DiffSource {
    /// Classify a user-supplied path into a source.
    ///
    /// Directories become [`DiffSource::Directory`], files named `*.jar`
    /// (case-insensitive) become [`DiffSource::Jar`]; anything else is
    /// rejected as an unsupported path kind.
    pub fn open(tag: SideTag, path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Ok(DiffSource::Directory {
                tag,
                path: path.to_path_buf(),
            });
        }
        if !path.exists() {
            return Err(JarDiffError::SourceNotFound(path.to_path_buf()));
        }
        let is_jar = path
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase().ends_with(".jar"))
            .unwrap_or(false);
        if !is_jar {
            return Err(JarDiffError::UnsupportedPathKind(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let archive = ZipArchive::new(file).map_err(|e| JarDiffError::ArchiveCorrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(DiffSource::Jar {
            tag,
            path: path.to_path_buf(),
            archive: Rc::new(RefCell::new(archive)),
        })
    }

    pub fn tag(&self) -> SideTag {
        match self {
            DiffSource::Jar { tag, .. } | DiffSource::Directory { tag, .. } => *tag,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            DiffSource::Jar { path, .. } | DiffSource::Directory { path, .. } => path,
        }
    }

    /// Enumerate all leaf files of this side, keyed by slash-separated
    /// relative path. Byte content is not read here; entries open lazily.
    pub fn enumerate(&self) -> Result<BTreeMap<String, SourceEntry>> {
        let mut entries = BTreeMap::new();
        match self {
            DiffSource::Jar { path, archive, .. } => {
                let mut zip = archive.borrow_mut();
                for index in 0..zip.len() {
                    let entry = zip.by_index(index).map_err(|e| JarDiffError::ArchiveCorrupt {
                        path: path.clone(),
                        reason: e.to_string(),
                    })?;
                    if entry.is_dir() {
                        continue;
                    }
                    let name = entry.name().to_string();
                    entries.insert(
                        name.clone(),
                        SourceEntry {
                            relative_path: name,
                            origin: EntryOrigin::Jar {
                                archive: Rc::clone(archive),
                            },
                        },
                    );
                }
            }
            DiffSource::Directory { path, .. } => {
                if !path.is_dir() {
                    return Err(JarDiffError::SourceNotFound(path.clone()));
                }
                for entry in WalkDir::new(path).follow_links(true) {
                    let entry = entry.map_err(|e| walk_error(path, e))?;
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    let relative = entry
                        .path()
                        .strip_prefix(path)
                        .map_err(|e| JarDiffError::Config(e.to_string()))?;
                    let relative_path = relative
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy())
                        .collect::<Vec<_>>()
                        .join("/");
                    entries.insert(
                        relative_path.clone(),
                        SourceEntry {
                            relative_path,
                            origin: EntryOrigin::Local {
                                path: entry.path().to_path_buf(),
                            },
                        },
                    );
                }
            }
        }
        debug!("enumerated {} entries from {}", entries.len(), self.path().display());
        Ok(entries)
    }

    /// Release the underlying archive handle, if any.
    pub fn close(self) -> Result<()> {
        if let DiffSource::Jar { archive, .. } = self {
            drop(archive);
        }
        Ok(())
    }
}

fn walk_error(root: &Path, error: walkdir::Error) -> JarDiffError {
    let root_vanished = error
        .io_error()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false);
    if root_vanished {
        JarDiffError::SourceNotFound(root.to_path_buf())
    } else {
        let message = error.to_string();
        JarDiffError::Io(
            error
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other(message)),
        )
    }
}

/// A leaf file within one side, with lazily-opened byte content.
#[derive(Clone)]
pub struct SourceEntry {
    /// Slash-separated path relative to the side's root; unique per side.
    pub relative_path: String,
    origin: EntryOrigin,
}

#[derive(Clone)]
enum EntryOrigin {
    Local { path: PathBuf },
    Jar { archive: SharedArchive },
}

impl SourceEntry {
    /// Read the full byte content. Each call opens and closes the stream;
    /// callers consume the bytes once per classification.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        match &self.origin {
            EntryOrigin::Local { path } => Ok(std::fs::read(path)?),
            EntryOrigin::Jar { archive } => {
                let mut zip = archive.borrow_mut();
                let mut entry = zip
                    .by_name(&self.relative_path)
                    .map_err(|e| JarDiffError::Config(e.to_string()))?;
                let mut bytes = Vec::new();
                entry.read_to_end(&mut bytes)?;
                Ok(bytes)
            }
        }
    }

    /// The file extension of the entry name, without the dot.
    pub fn extension(&self) -> Option<&str> {
        self.relative_path
            .rsplit('/')
            .next()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, extension)| extension)
    }
}

impl std::fmt::Debug for SourceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceEntry")
            .field("relative_path", &self.relative_path)
            .finish()
    }
}
