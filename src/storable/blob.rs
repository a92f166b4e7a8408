use super::{frame, ObjectKind, Storable};

use crate::digest::Digest;

pub struct Blob {
    oid: Digest,
    formatted: Vec<u8>,
}

impl Storable for Blob {
    fn formatted(&self) -> &[u8] {
        &self.formatted
    }

    fn get_oid(&self) -> &Digest {
        &self.oid
    }

    fn into_oid(self) -> Digest {
        self.oid
    }
}

impl Blob {
    /// Frame `data` verbatim. Any bytes are allowed.
    pub fn new(data: &[u8]) -> Self {
        let formatted = frame(ObjectKind::Blob, data);
        let oid = Digest::new(&formatted);

        Self { oid, formatted }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Generate a blob with known contents. Ensure that the OID and the formatted output are as
    /// expected.
    fn test_blob_format() {
        let text = "hello\n";
        let expected_hash = [
            206, 1, 54, 37, 3, 11, 168, 219, 169, 6, 247, 86, 150, 127, 158, 156, 163, 148, 70, 74,
        ];
        let blob = Blob::new(text.as_bytes());
        let formatted = blob.formatted();
        assert_eq!(*blob.oid, expected_hash);
        assert_eq!(formatted, b"blob 6\0hello\n");
    }

    #[test]
    fn test_binary_blob() {
        let data = [0u8, 159, 146, 150, b'\n', 0];
        let blob = Blob::new(&data);
        assert_eq!(&blob.formatted()[..7], b"blob 6\0");
        assert_eq!(&blob.formatted()[7..], &data);
        // `printf 'blob 0\0' | sha1sum`
        assert_eq!(
            Blob::new(b"").into_oid().to_hex(),
            "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391"
        );
    }
}
