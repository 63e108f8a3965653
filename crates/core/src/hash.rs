//! BLAKE3 hashing for content fingerprints

use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Files at or above this size are hashed through a memory map
pub const MMAP_THRESHOLD: u64 = 4 * 1024 * 1024;

/// A BLAKE3 hash (32 bytes)
///
/// Serialized as a 64-character lowercase hex string so the fingerprint
/// file stays readable.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Blake3Hash([u8; 32]);

impl Blake3Hash {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string
    pub fn from_hex(s: &str) -> Result<Self> {
        if s.len() != 64 {
            anyhow::bail!("Invalid hex length: expected 64 characters, got {}", s.len());
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl std::fmt::Debug for Blake3Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Blake3Hash({})", self.to_hex())
    }
}

impl std::fmt::Display for Blake3Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Blake3Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Blake3Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Blake3Hash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Hash bytes using BLAKE3
pub fn hash_bytes(data: &[u8]) -> Blake3Hash {
    Blake3Hash::from_bytes(*blake3::hash(data).as_bytes())
}

/// Hash a file using BLAKE3 (streaming)
pub fn hash_file(path: &Path) -> io::Result<Blake3Hash> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = blake3::Hasher::new();

    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(Blake3Hash::from_bytes(*hasher.finalize().as_bytes()))
}

/// Hash a file using memory-mapped I/O
pub fn hash_file_mmap(path: &Path) -> io::Result<Blake3Hash> {
    use memmap2::Mmap;

    let file = File::open(path)?;
    // SAFETY: the map is read-only and dropped before returning. A concurrent
    // writer can at worst produce a hash of torn content, which the next scan
    // corrects.
    let mmap = unsafe { Mmap::map(&file)? };
    Ok(hash_bytes(&mmap))
}

/// Hash a file, picking streaming or mmap by size
pub fn hash_file_auto(path: &Path, size: u64) -> io::Result<Blake3Hash> {
    if size >= MMAP_THRESHOLD {
        hash_file_mmap(path)
    } else {
        hash_file(path)
    }
}
