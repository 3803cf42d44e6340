use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::form::FormDraft;
use super::StoreError;

const FILE_VERSION: u32 = 1;

/// A prefilled claim waiting to be opened in the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub teacher_id: String,
    #[serde(rename = "initialData")]
    pub initial_data: FormDraft,
    pub semester_name: String,
    pub exam_year: i32,
}

impl Entry {
    /// The draft to hydrate the form with. The entry's own teacher and
    /// semester context fill any header field the draft leaves out.
    pub fn into_draft(self) -> FormDraft {
        let mut draft = self.initial_data;
        draft.teacher_id.get_or_insert(self.teacher_id);
        if !self.semester_name.is_empty() {
            draft.semester_name.get_or_insert(self.semester_name);
        }
        if self.exam_year > 0 {
            draft.exam_year.get_or_insert(self.exam_year);
        }
        draft
    }
}

#[derive(Deserialize)]
struct StoreFile {
    version: u32,
    entries: BTreeMap<String, Entry>,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    version: u32,
    entries: &'a BTreeMap<String, Entry>,
}

/// Draft entries keyed by teacher id, persisted to a JSON file.
///
/// Cloning yields another handle to the same map. Writes hold the lock while
/// the file is rewritten, so the file always reflects the latest write.
#[derive(Clone)]
pub struct EntryStore {
    entries: Arc<RwLock<BTreeMap<String, Entry>>>,
    path: Option<PathBuf>,
}

impl EntryStore {
    /// Load the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => {
                let file: StoreFile = serde_json::from_slice(&bytes)?;
                if file.version != FILE_VERSION {
                    log::warn!(
                        "Entry store {} has version {}, expected {FILE_VERSION}",
                        path.display(),
                        file.version
                    );
                }
                file.entries
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        log::info!("Loaded {} draft entr(ies) from {}", entries.len(), path.display());
        Ok(Self {
            entries: Arc::new(RwLock::new(entries)),
            path: Some(path),
        })
    }

    /// A store that never touches the disk.
    pub fn in_memory() -> Self {
        Self {
            entries: Arc::new(RwLock::new(BTreeMap::new())),
            path: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Insert or overwrite the entry for `teacher_id`. No merge with a prior entry.
    pub fn put(
        &self,
        teacher_id: &str,
        data: FormDraft,
        semester_name: &str,
        exam_year: i32,
    ) -> Result<Entry, StoreError> {
        let entry = Entry {
            teacher_id: teacher_id.to_string(),
            initial_data: data,
            semester_name: semester_name.to_string(),
            exam_year,
        };
        self.write(|map| {
            map.insert(teacher_id.to_string(), entry.clone());
        })?;
        log::debug!("Stored draft entry for {teacher_id}");
        Ok(entry)
    }

    pub fn get(&self, teacher_id: &str) -> Option<Entry> {
        let map = self.entries.read().unwrap_or_else(|e| e.into_inner());
        map.get(teacher_id).cloned()
    }

    pub fn remove(&self, teacher_id: &str) -> Result<Option<Entry>, StoreError> {
        let mut removed = None;
        self.write(|map| removed = map.remove(teacher_id))?;
        Ok(removed)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.write(|map| map.clear())
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries, ordered by teacher id.
    pub fn list(&self) -> Vec<Entry> {
        let map = self.entries.read().unwrap_or_else(|e| e.into_inner());
        map.values().cloned().collect()
    }

    /// Apply `change` and persist. If persisting fails the in-memory map is
    /// rolled back so memory and disk stay in step.
    fn write(&self, change: impl FnOnce(&mut BTreeMap<String, Entry>)) -> Result<(), StoreError> {
        let mut map = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = self.path.as_ref().map(|_| map.clone());
        change(&mut map);

        if let (Some(path), Some(before)) = (&self.path, before) {
            if let Err(e) = persist(path, &map) {
                *map = before;
                log::error!("Failed to persist entry store {}: {e}", path.display());
                return Err(e);
            }
        }
        Ok(())
    }
}

fn persist(path: &Path, entries: &BTreeMap<String, Entry>) -> Result<(), StoreError> {
    let file = StoreFileRef {
        version: FILE_VERSION,
        entries,
    };
    let bytes = serde_json::to_vec_pretty(&file)?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;
    let tmp = parent.join(format!(
        ".{}.tmp.{}",
        path.file_name().and_then(|s| s.to_str()).unwrap_or("entries"),
        std::process::id()
    ));
    {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(&bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}
