//! Text buffers.
//!
//! The room always has at least one buffer. Buffers are plain strings
//! edited through egui's `TextEdit`; paths and modified flags hang off
//! them for the save/quit flows.

use std::io;
use std::path::PathBuf;

/// One open text, possibly backed by a file.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    pub text: String,
    pub path: Option<PathBuf>,
    pub modified: bool,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(path: PathBuf) -> io::Result<Self> {
        let text = std::fs::read_to_string(&path)?;
        Ok(Self {
            text,
            path: Some(path),
            modified: false,
        })
    }

    /// File name for display, or `None` for an unnamed buffer.
    pub fn title(&self) -> Option<String> {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
    }

    /// Write back to the buffer's own path. Unnamed buffers need
    /// [`save_as`](Self::save_as).
    pub fn save(&mut self) -> io::Result<()> {
        if let Some(path) = self.path.clone() {
            std::fs::write(&path, &self.text)?;
            self.modified = false;
        }
        Ok(())
    }

    pub fn save_as(&mut self, path: PathBuf) -> io::Result<()> {
        std::fs::write(&path, &self.text)?;
        self.path = Some(path);
        self.modified = false;
        Ok(())
    }

    /// Stable file name for this buffer's autosave snapshot.
    pub fn autosave_name(&self) -> String {
        match self.title() {
            Some(name) => format!("{}.autosave", name),
            None => "untitled.autosave".to_string(),
        }
    }
}

/// The open buffers and which one is showing.
#[derive(Debug, Default)]
pub struct BufferList {
    buffers: Vec<Buffer>,
    current: usize,
}

impl BufferList {
    /// Starts with a single empty buffer.
    pub fn new() -> Self {
        Self {
            buffers: vec![Buffer::new()],
            current: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// 1-based position of the showing buffer, for status messages.
    pub fn position(&self) -> usize {
        self.current + 1
    }

    pub fn current(&self) -> &Buffer {
        &self.buffers[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Buffer {
        &mut self.buffers[self.current]
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Buffer> {
        self.buffers.iter_mut()
    }

    /// Append an empty buffer and switch to it.
    pub fn new_buffer(&mut self) {
        self.buffers.push(Buffer::new());
        self.current = self.buffers.len() - 1;
    }

    /// Open a file into a new buffer and switch to it. If the file is
    /// already open, just switch there.
    pub fn open(&mut self, path: PathBuf) -> io::Result<()> {
        if let Some(idx) = self
            .buffers
            .iter()
            .position(|b| b.path.as_deref() == Some(path.as_path()))
        {
            self.current = idx;
            return Ok(());
        }
        let buffer = Buffer::open(path)?;
        // An untouched unnamed buffer gets replaced rather than left behind.
        let cur = &self.buffers[self.current];
        if cur.path.is_none() && cur.text.is_empty() && !cur.modified {
            self.buffers[self.current] = buffer;
        } else {
            self.buffers.push(buffer);
            self.current = self.buffers.len() - 1;
        }
        Ok(())
    }

    /// Close the showing buffer. The list never goes empty.
    pub fn close_current(&mut self) {
        self.buffers.remove(self.current);
        if self.buffers.is_empty() {
            self.buffers.push(Buffer::new());
        }
        if self.current >= self.buffers.len() {
            self.current = self.buffers.len() - 1;
        }
    }

    /// Cycle forward, wrapping past the end.
    pub fn next(&mut self) {
        self.current = (self.current + 1) % self.buffers.len();
    }

    /// Cycle backward, wrapping past the start.
    pub fn prev(&mut self) {
        self.current = (self.current + self.buffers.len() - 1) % self.buffers.len();
    }

    /// Whether any buffer has unsaved changes.
    pub fn any_modified(&self) -> bool {
        self.buffers.iter().any(|b| b.modified)
    }

    /// The modified buffers, for the quit dialog listing and autosave.
    pub fn modified_buffers(&self) -> impl Iterator<Item = &Buffer> {
        self.buffers.iter().filter(|b| b.modified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_one_empty_buffer() {
        let list = BufferList::new();
        assert_eq!(list.len(), 1);
        assert_eq!(list.position(), 1);
        assert!(list.current().text.is_empty());
        assert!(!list.any_modified());
    }

    #[test]
    fn test_new_buffer_switches() {
        let mut list = BufferList::new();
        list.current_mut().text = "first".to_string();
        list.new_buffer();
        assert_eq!(list.len(), 2);
        assert_eq!(list.position(), 2);
        assert!(list.current().text.is_empty());
    }

    #[test]
    fn test_cycling_wraps() {
        let mut list = BufferList::new();
        list.new_buffer();
        list.new_buffer();
        assert_eq!(list.position(), 3);
        list.next();
        assert_eq!(list.position(), 1);
        list.prev();
        assert_eq!(list.position(), 3);
        list.prev();
        assert_eq!(list.position(), 2);
    }

    #[test]
    fn test_open_replaces_pristine_buffer() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("draft.txt");
        std::fs::write(&path, "words").unwrap();

        let mut list = BufferList::new();
        list.open(path.clone()).unwrap();
        // opened into the untouched starting buffer
        assert_eq!(list.len(), 1);
        assert_eq!(list.current().text, "words");
        assert_eq!(list.current().title().as_deref(), Some("draft.txt"));
    }

    #[test]
    fn test_open_dedupes_already_open_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("draft.txt");
        std::fs::write(&path, "words").unwrap();

        let mut list = BufferList::new();
        list.current_mut().text = "scratch".to_string();
        list.current_mut().modified = true;
        list.open(path.clone()).unwrap();
        assert_eq!(list.len(), 2);
        list.prev();
        assert_eq!(list.current().text, "scratch");
        // reopen just switches back, no third buffer
        list.open(path.clone()).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.current().text, "words");
    }

    #[test]
    fn test_close_never_leaves_list_empty() {
        let mut list = BufferList::new();
        list.close_current();
        assert_eq!(list.len(), 1);

        list.new_buffer();
        list.close_current();
        assert_eq!(list.len(), 1);
        assert_eq!(list.position(), 1);
    }

    #[test]
    fn test_save_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.txt");

        let mut buffer = Buffer::new();
        buffer.text = "hello room".to_string();
        buffer.modified = true;
        buffer.save_as(path.clone()).unwrap();
        assert!(!buffer.modified);

        let reloaded = Buffer::open(path).unwrap();
        assert_eq!(reloaded.text, "hello room");
    }

    #[test]
    fn test_modified_listing() {
        let mut list = BufferList::new();
        list.current_mut().modified = true;
        list.new_buffer();
        assert_eq!(list.modified_buffers().count(), 1);
        assert!(list.any_modified());
    }

    #[test]
    fn test_autosave_name() {
        let mut buffer = Buffer::new();
        assert_eq!(buffer.autosave_name(), "untitled.autosave");
        buffer.path = Some(PathBuf::from("/tmp/novel.txt"));
        assert_eq!(buffer.autosave_name(), "novel.txt.autosave");
    }
}
