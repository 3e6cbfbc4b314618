//! Per-page validity bitmap.
//!
//! Bit `i` (LSB-first within each byte) is set once slot `i` has been
//! written. An unset bit means the slot holds no value.

/// Validity bitmap for the slots of one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    bytes: Vec<u8>,
}

impl Bitmap {
    /// Create an all-clear bitmap of `size` bytes
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0u8; size],
        }
    }

    /// Wrap bytes read from disk
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Test the bit for `slot`. Out-of-range slots are never set.
    pub fn is_set(&self, slot: usize) -> bool {
        self.bytes
            .get(slot / 8)
            .is_some_and(|byte| byte & (1 << (slot % 8)) != 0)
    }

    /// Set the bit for `slot`. Idempotent.
    pub fn set(&mut self, slot: usize) {
        if let Some(byte) = self.bytes.get_mut(slot / 8) {
            *byte |= 1 << (slot % 8);
        }
    }
}
