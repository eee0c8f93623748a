//! # Persistence
//!
//! A world is saved as its generation parameters plus the player's edits. Chunk
//! grids and instance lists are never stored; they are rederived by regenerating.
//!
//! The storage medium is a collaborator behind the `WorldStorage` trait, which only
//! moves opaque bytes. Two media ship with the crate: `MemoryStorage` and
//! `FileStorage`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::voxels::{
    block::BlockTypeSize,
    edit_store::{EditEntry, EditStore},
    params::GenerationParams,
};

/// Errors raised while saving or loading a world.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save data is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("save data references unknown block id {0}")]
    UnknownBlock(BlockTypeSize),
}

/// A medium that can hold one saved world.
pub trait WorldStorage {
    /// Replaces the stored world with `bytes`.
    fn save(&mut self, bytes: &[u8]) -> Result<(), PersistenceError>;

    /// Returns the stored world, or `None` if nothing has been saved.
    fn load(&self) -> Result<Option<Vec<u8>>, PersistenceError>;
}

/// Keeps the saved world in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    bytes: Option<Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorldStorage for MemoryStorage {
    fn save(&mut self, bytes: &[u8]) -> Result<(), PersistenceError> {
        self.bytes = Some(bytes.to_vec());
        Ok(())
    }

    fn load(&self) -> Result<Option<Vec<u8>>, PersistenceError> {
        Ok(self.bytes.clone())
    }
}

/// Keeps the saved world in a single file.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WorldStorage for FileStorage {
    fn save(&mut self, bytes: &[u8]) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, bytes)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<Vec<u8>>, PersistenceError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// The complete saved state of a world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub params: GenerationParams,
    pub edits: Vec<EditEntry>,
}

impl SaveData {
    pub fn new(params: GenerationParams, edits: &EditStore) -> Self {
        SaveData {
            params,
            edits: edits.entries(),
        }
    }

    /// Serializes the save as JSON.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistenceError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Splits the save into parameters and a rebuilt edit store.
    pub fn into_parts(self) -> Result<(GenerationParams, EditStore), PersistenceError> {
        let edits = EditStore::from_entries(&self.edits).map_err(PersistenceError::UnknownBlock)?;
        Ok((self.params, edits))
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::{FileStorage, MemoryStorage, PersistenceError, SaveData, WorldStorage};
    use crate::engine_state::voxels::{
        block::block_type::BlockType, edit_store::EditStore, params::GenerationParams,
    };

    fn sample_save() -> SaveData {
        let mut edits = EditStore::new();
        edits.set((32, -64), Point3::new(4, 10, 31), BlockType::COAL_ORE);
        edits.set((0, 0), Point3::new(0, 5, 0), BlockType::EMPTY);
        SaveData::new(GenerationParams::with_seed(123), &edits)
    }

    #[test]
    fn save_data_survives_serialization() {
        let save = sample_save();
        let bytes = save.to_bytes().expect("serializable");
        let restored = SaveData::from_bytes(&bytes).expect("deserializable");
        assert_eq!(restored, save);

        let (params, edits) = restored.into_parts().expect("known blocks");
        assert_eq!(params.seed, 123);
        assert_eq!(
            edits.get((32, -64), Point3::new(4, 10, 31)),
            Some(BlockType::COAL_ORE)
        );
    }

    #[test]
    fn unknown_block_ids_are_rejected() {
        let mut save = sample_save();
        save.edits[0].block = 99;
        assert!(matches!(
            save.into_parts(),
            Err(PersistenceError::UnknownBlock(99))
        ));
    }

    #[test]
    fn garbage_is_a_serialization_error() {
        assert!(matches!(
            SaveData::from_bytes(b"not json"),
            Err(PersistenceError::Serialization(_))
        ));
    }

    #[test]
    fn memory_storage_starts_empty_and_keeps_the_latest_save() {
        let mut storage = MemoryStorage::new();
        assert!(storage.load().expect("in memory").is_none());

        storage.save(b"first").expect("in memory");
        storage.save(b"second").expect("in memory");
        assert_eq!(storage.load().expect("in memory"), Some(b"second".to_vec()));
    }

    #[test]
    fn file_storage_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut storage = FileStorage::new(dir.path().join("saves").join("world.json"));

        assert!(storage.load().expect("missing file is not an error").is_none());

        let bytes = sample_save().to_bytes().expect("serializable");
        storage.save(&bytes).expect("writable");
        assert_eq!(storage.load().expect("readable"), Some(bytes));
    }
}
