//! Persistence: checksummed binary save file for the meta-progression
//! state (currencies, upgrade levels, wave counter).

use crate::core::constants::SAVE_VERSION_MAGIC;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

/// The persisted record. Multipliers are not stored; they are rebuilt
/// from `upgrade_levels` on restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub total_currency: u32,
    pub run_currency: u32,
    pub last_run_earnings: u32,
    /// Wave to resume at; 1 when there is no run to resume.
    pub wave: u32,
    pub upgrade_levels: Vec<(String, u32)>,
    /// Unix timestamp of the save.
    pub saved_at: i64,
}

/// Manages saving and loading progression with a checksummed binary format.
pub struct SaveManager {
    save_path: PathBuf,
}

impl SaveManager {
    /// Sets up the save file at the platform's config directory using the
    /// `directories` crate.
    pub fn new() -> io::Result<Self> {
        let project_dirs = ProjectDirs::from("", "", "breakroom").ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "Could not determine config directory")
        })?;

        let config_dir = project_dirs.config_dir();
        fs::create_dir_all(config_dir)?;

        Ok(Self {
            save_path: config_dir.join("save.dat"),
        })
    }

    /// Uses an explicit file path instead of the platform directory.
    pub fn with_path(save_path: PathBuf) -> Self {
        Self { save_path }
    }

    /// Saves the progression record to disk with checksum verification
    ///
    /// File format:
    /// - Version magic (8 bytes)
    /// - Data length (4 bytes)
    /// - Serialized record (variable length)
    /// - SHA256 checksum (32 bytes)
    pub fn save(&self, data: &SaveData) -> io::Result<()> {
        let payload = bincode::serialize(data)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let payload_len = payload.len() as u32;

        // Checksum covers version + length + payload.
        let mut hasher = Sha256::new();
        hasher.update(SAVE_VERSION_MAGIC.to_le_bytes());
        hasher.update(payload_len.to_le_bytes());
        hasher.update(&payload);
        let checksum = hasher.finalize();

        let mut file = fs::File::create(&self.save_path)?;
        file.write_all(&SAVE_VERSION_MAGIC.to_le_bytes())?;
        file.write_all(&payload_len.to_le_bytes())?;
        file.write_all(&payload)?;
        file.write_all(&checksum)?;

        log::info!("saved progression to {}", self.save_path.display());
        Ok(())
    }

    /// Loads the progression record from disk with checksum verification
    ///
    /// Returns an error if:
    /// - The file doesn't exist (this is the "no save" signal)
    /// - The version magic is incorrect
    /// - The checksum verification fails
    /// - The record cannot be deserialized
    pub fn load(&self) -> io::Result<SaveData> {
        let mut file = fs::File::open(&self.save_path)?;

        let mut version_bytes = [0u8; 8];
        file.read_exact(&mut version_bytes)?;
        let version = u64::from_le_bytes(version_bytes);

        if version != SAVE_VERSION_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Invalid save version: expected 0x{:016X}, got 0x{:016X}",
                    SAVE_VERSION_MAGIC, version
                ),
            ));
        }

        let mut length_bytes = [0u8; 4];
        file.read_exact(&mut length_bytes)?;
        let payload_len = u32::from_le_bytes(length_bytes);

        let mut payload = vec![0u8; payload_len as usize];
        file.read_exact(&mut payload)?;

        let mut stored_checksum = [0u8; 32];
        file.read_exact(&mut stored_checksum)?;

        let mut hasher = Sha256::new();
        hasher.update(version_bytes);
        hasher.update(length_bytes);
        hasher.update(&payload);
        let computed_checksum = hasher.finalize();

        if stored_checksum != computed_checksum.as_slice() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Checksum verification failed",
            ));
        }

        let data = bincode::deserialize(&payload)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        Ok(data)
    }

    /// Checks if a save file exists. Absence means "never saved", not an
    /// error.
    pub fn save_exists(&self) -> bool {
        self.save_path.exists()
    }

    /// Deletes the save file, e.g. when starting a new game. Succeeds if
    /// there was nothing to delete.
    pub fn clear_save(&self) -> io::Result<()> {
        match fs::remove_file(&self.save_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
