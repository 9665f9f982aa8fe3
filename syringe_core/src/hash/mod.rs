pub mod sha256;

pub use sha256::Sha256;

use std::fmt::{Debug, Display, Formatter, LowerHex};

pub const DIGEST_SIZE: usize = 32;

/// A SHA-256 digest, used as the content address of a resource.
///
/// The canonical text form (used by [Display]) is 64 lowercase hex characters.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Digest(pub [u8; DIGEST_SIZE]);

impl LowerHex for Digest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        LowerHex::fmt(self, f)
    }
}

impl Debug for Digest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Digest({self})")
    }
}
