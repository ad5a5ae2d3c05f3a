//! Checksum side-files (`.sha1`, `.md5`).

use sha1::{Digest, Sha1};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    Sha1,
    Md5,
}

impl ChecksumAlgorithm {
    pub const ALL: [ChecksumAlgorithm; 2] = [ChecksumAlgorithm::Sha1, ChecksumAlgorithm::Md5];

    pub fn extension(self) -> &'static str {
        match self {
            ChecksumAlgorithm::Sha1 => "sha1",
            ChecksumAlgorithm::Md5 => "md5",
        }
    }

    /// Lowercase hex digest of `data`.
    pub fn digest(self, data: &[u8]) -> String {
        match self {
            ChecksumAlgorithm::Sha1 => hex::encode(Sha1::digest(data)),
            ChecksumAlgorithm::Md5 => format!("{:x}", md5::compute(data)),
        }
    }

    /// Name of the side-file for `filename`.
    pub fn side_file(self, filename: &str) -> String {
        format!("{}.{}", filename, self.extension())
    }

    /// Side-file content: the digest followed by two spaces and the file name.
    pub fn side_file_content(self, data: &[u8], filename: &str) -> String {
        format!("{}  {}\n", self.digest(data), filename)
    }
}

/// True for `.sha1` and `.md5` files, ignoring case.
pub fn is_checksum_file(filename: &str) -> bool {
    let lower = filename.to_ascii_lowercase();
    ChecksumAlgorithm::ALL
        .iter()
        .any(|a| lower.ends_with(&format!(".{}", a.extension())))
}
