use bytes::Bytes;

/// Largest batch the picker may stage at once.
pub const MAX_SELECTION: usize = 10;

pub type PreviewId = u64;

/// A file chosen by the user: name, MIME type and the bytes read by the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub name: String,
    pub mime_type: String,
    pub data: Bytes,
}

impl StagedFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StagedEntry {
    file: StagedFile,
    preview_id: PreviewId,
}

/// Why a picked batch was not staged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectRejected {
    Empty,
    TooMany { count: usize },
}

/// Preview bookkeeping produced by replacing the selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionChange {
    pub revoked: Vec<PreviewId>,
    pub created: Vec<(PreviewId, StagedFile)>,
}

/// Staged files, their preview ids and the active preview pointer.
///
/// Every preview id handed out by [`SelectionStore::select_files`] comes back
/// exactly once through `select_files`, `remove_file` or `clear`, so the
/// caller can release the matching handle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionStore {
    entries: Vec<StagedEntry>,
    active: Option<usize>,
    last_preview_id: PreviewId,
    generation: u64,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole selection with a freshly picked batch.
    pub fn select_files(
        &mut self,
        files: Vec<StagedFile>,
    ) -> Result<SelectionChange, SelectRejected> {
        if files.is_empty() {
            return Err(SelectRejected::Empty);
        }
        if files.len() > MAX_SELECTION {
            return Err(SelectRejected::TooMany { count: files.len() });
        }

        let revoked = self.release_all();
        let mut created = Vec::with_capacity(files.len());
        for file in files {
            self.last_preview_id += 1;
            let preview_id = self.last_preview_id;
            created.push((preview_id, file.clone()));
            self.entries.push(StagedEntry { file, preview_id });
        }
        self.active = Some(0);
        self.generation += 1;

        Ok(SelectionChange { revoked, created })
    }

    /// Drop one staged file, returning the preview id to revoke.
    pub fn remove_file(&mut self, index: usize) -> Option<PreviewId> {
        if index >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(index).preview_id;
        self.active = match self.active {
            _ if self.entries.is_empty() => None,
            Some(active) if active >= self.entries.len() => Some(self.entries.len() - 1),
            other => other,
        };
        self.generation += 1;
        Some(removed)
    }

    pub fn set_active_preview_index(&mut self, index: usize) -> bool {
        if index >= self.entries.len() || self.active == Some(index) {
            return false;
        }
        self.active = Some(index);
        true
    }

    /// Empty the selection, returning every preview id still held.
    pub fn clear(&mut self) -> Vec<PreviewId> {
        let revoked = self.release_all();
        if !revoked.is_empty() {
            self.generation += 1;
        }
        revoked
    }

    fn release_all(&mut self) -> Vec<PreviewId> {
        self.active = None;
        self.entries.drain(..).map(|entry| entry.preview_id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn files(&self) -> impl Iterator<Item = &StagedFile> {
        self.entries.iter().map(|entry| &entry.file)
    }

    pub fn preview_ids(&self) -> impl Iterator<Item = PreviewId> + '_ {
        self.entries.iter().map(|entry| entry.preview_id)
    }

    /// Bumped on every mutation of the staged sequence.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
