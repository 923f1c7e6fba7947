//! On-disk [`CellStore`] backend: an append-only file of
//! `(hash:32, length:u64, bytes)` records, random access via an in-memory
//! index keyed by hash and rebuilt by scanning the file at open. A plain
//! hash map gives the same O(1) lookup as a trie-shaped index without
//! persisting the index itself, so there is no canonicity rule to enforce
//! on it the way there is for the on-wire tries — see `DESIGN.md`. A
//! partial trailing record — the file was truncated mid-write by a crash —
//! is detected and the file truncated back to the last complete record.

use std::collections::HashMap as StdHashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use shared_types::Hash;
use tracing::{info, warn};

use crate::{CellStore, StoreError};

const HEADER_LEN: u64 = 32 + 8;

struct IndexEntry {
    offset: u64,
    len: u64,
}

/// Append-only on-disk cell store with a hash-keyed index kept in memory
/// and rebuilt from the file at open.
pub struct DiskStore {
    path: PathBuf,
    file: Mutex<File>,
    index: Mutex<StdHashMap<Hash, IndexEntry>>,
}

impl DiskStore {
    /// Open (creating if absent) the store file at `path`, scanning it to
    /// rebuild the index and truncating any partial trailing record.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new().create(true).read(true).write(true).open(&path)?;
        let index = Mutex::new(scan_and_truncate(&mut file, &path)?);
        Ok(DiskStore { path, file: Mutex::new(file), index })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of distinct cells stored.
    pub fn len(&self) -> usize {
        self.index.lock().len()
    }

    /// `true` if the store holds no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn scan_and_truncate(file: &mut File, path: &Path) -> Result<StdHashMap<Hash, IndexEntry>, StoreError> {
    let mut index = StdHashMap::new();
    file.seek(SeekFrom::Start(0))?;
    let mut offset: u64 = 0;
    loop {
        let mut header = [0u8; HEADER_LEN as usize];
        match read_exact_or_eof(file, &mut header)? {
            0 => break,
            n if n < header.len() => {
                warn!(path = %path.display(), offset, "partial trailing record header; truncating");
                file.set_len(offset)?;
                break;
            }
            _ => {}
        }
        let mut hash_bytes = [0u8; 32];
        hash_bytes.copy_from_slice(&header[..32]);
        let len = u64::from_le_bytes(header[32..40].try_into().unwrap());
        let body_offset = offset + HEADER_LEN;

        let mut body = vec![0u8; len as usize];
        let read = read_exact_or_eof(file, &mut body)?;
        if (read as u64) < len {
            warn!(path = %path.display(), offset, len, "partial trailing record body; truncating");
            file.set_len(offset)?;
            break;
        }

        index.insert(Hash::from_bytes(hash_bytes), IndexEntry { offset: body_offset, len });
        offset = body_offset + len;
    }
    info!(path = %path.display(), records = index.len(), "disk store opened");
    Ok(index)
}

fn read_exact_or_eof(file: &mut File, buf: &mut [u8]) -> Result<usize, StoreError> {
    let mut total = 0;
    while total < buf.len() {
        let n = file.read(&mut buf[total..])?;
        if n == 0 {
            break;
        }
        total += n;
    }
    Ok(total)
}

impl CellStore for DiskStore {
    fn put(&self, hash: Hash, bytes: &[u8]) -> Result<(), StoreError> {
        if self.index.lock().contains_key(&hash) {
            return Ok(()); // idempotent: identical bytes under a content hash
        }
        let mut file = self.file.lock();
        let offset = file.seek(SeekFrom::End(0))?;
        file.write_all(hash.as_bytes())?;
        file.write_all(&(bytes.len() as u64).to_le_bytes())?;
        file.write_all(bytes)?;
        file.flush()?;
        self.index.lock().insert(hash, IndexEntry { offset: offset + HEADER_LEN, len: bytes.len() as u64 });
        Ok(())
    }

    fn get(&self, hash: &Hash) -> Result<Option<Vec<u8>>, StoreError> {
        let entry = match self.index.lock().get(hash) {
            Some(e) => (e.offset, e.len),
            None => return Ok(None),
        };
        let (offset, len) = entry;
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; len as usize];
        file.read_exact(&mut buf)?;
        Ok(Some(buf))
    }

    fn has(&self, hash: &Hash) -> Result<bool, StoreError> {
        Ok(self.index.lock().contains_key(hash))
    }
}
