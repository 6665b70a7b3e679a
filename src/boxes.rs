use serde::{Serialize, Serializer};
use std::fmt;

/// Four-character box type tag.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub fn as_str_lossy(&self) -> String {
        self.0
            .iter()
            .map(|&c| if (32..=126).contains(&c) { c as char } else { '.' })
            .collect()
    }

    /// Container boxes own a sequence of child boxes instead of an opaque
    /// payload. The set is fixed; everything else is a leaf.
    pub fn is_container(&self) -> bool {
        matches!(
            &self.0,
            b"moov" | b"trak" | b"mdia" | b"minf" | b"dinf" | b"stbl"
        )
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

impl Serialize for FourCC {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_str_lossy())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BoxHeader {
    pub size: u64,        // total size including header
    pub header_size: u64, // 8, or 16 with the 64-bit size extension (0 for the root)
    pub typ: FourCC,
}

/// One box in the file: decoded header, absolute offset of the header's
/// first byte, and the ordered child list (on-disk order; same-tag
/// siblings stay separate entries).
#[derive(Debug, Serialize)]
pub struct BoxNode {
    pub offset: u64,
    #[serde(flatten)]
    pub header: BoxHeader,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BoxNode>,
}

impl BoxNode {
    pub fn new(header: BoxHeader, offset: u64) -> Self {
        BoxNode {
            offset,
            header,
            children: Vec::new(),
        }
    }

    /// Absolute offset of the first payload byte.
    pub fn payload_offset(&self) -> u64 {
        self.offset + self.header.header_size
    }

    /// Exclusive upper bound of this box's byte range. Saturates so a
    /// hostile 64-bit size cannot overflow the arithmetic.
    pub fn end_offset(&self) -> u64 {
        self.offset.saturating_add(self.header.size)
    }

    /// First child with the given tag, if any.
    pub fn first(&self, tag: &[u8; 4]) -> Option<&BoxNode> {
        self.all(tag).next()
    }

    /// All children with the given tag, in on-disk order.
    pub fn all(&self, tag: &[u8; 4]) -> impl Iterator<Item = &BoxNode> + '_ {
        let tag = *tag;
        self.children.iter().filter(move |c| c.header.typ.0 == tag)
    }
}

/// Synthetic box owning the file's top-level boxes. Its size is the total
/// input length and its header occupies no bytes.
#[derive(Debug, Serialize)]
pub struct RootBox {
    pub node: BoxNode,
}

impl RootBox {
    pub(crate) fn new(len: u64) -> Self {
        RootBox {
            node: BoxNode::new(
                BoxHeader {
                    size: len,
                    header_size: 0,
                    typ: FourCC(*b"root"),
                },
                0,
            ),
        }
    }
}
