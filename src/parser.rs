use crate::boxes::{BoxHeader, BoxNode, FourCC, RootBox};
use crate::info::MediaInfo;
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};
use tracing::trace;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed box size {0}")]
    MalformedSize(u64),
    #[error("invalid fixed-point field length {0}")]
    InvalidFixedPoint(usize),
    #[error("movie header time scale is zero")]
    ZeroTimeScale,
    #[error("unknown box type {0}")]
    UnknownBoxType(FourCC),
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Decode one box header at the given absolute offset.
///
/// Returns `Ok(None)` when fewer than 8 bytes remain: the caller treats
/// that as "no more boxes". A 32-bit size slot of 1 switches to the
/// trailing 64-bit size; a short read of that extension is an error, as
/// is any resolved size smaller than the header it came from.
pub fn read_header_at<R: Read + Seek>(r: &mut R, offset: u64) -> Result<Option<BoxHeader>> {
    r.seek(SeekFrom::Start(offset))?;

    let mut head = [0u8; 8];
    if let Err(e) = r.read_exact(&mut head) {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            return Ok(None);
        }
        return Err(e.into());
    }

    let size32 = u32::from_be_bytes([head[0], head[1], head[2], head[3]]);
    let typ = FourCC([head[4], head[5], head[6], head[7]]);

    let (size, header_size) = if size32 == 1 {
        (r.read_u64::<BigEndian>()?, 16)
    } else {
        (u64::from(size32), 8)
    };

    if size < header_size {
        return Err(ParseError::MalformedSize(size));
    }

    trace!(offset, size, header_size, box_type = %typ, "box header");
    Ok(Some(BoxHeader {
        size,
        header_size,
        typ,
    }))
}

/// Populate `parent.children` from the byte range between the parent's
/// header and its declared end.
///
/// The cursor is threaded explicitly: each sibling starts exactly
/// `child.size` bytes after the previous one, regardless of how many
/// bytes recursion into a container actually touched.
fn parse_children<R: Read + Seek>(r: &mut R, parent: &mut BoxNode) -> Result<()> {
    let mut cursor = parent.payload_offset();
    let end = parent.end_offset();

    while cursor < end {
        let header = match read_header_at(r, cursor)? {
            Some(h) => h,
            None => break,
        };

        let mut child = BoxNode::new(header, cursor);
        let next = cursor.saturating_add(child.header.size);

        if child.header.typ.is_container() {
            parse_children(r, &mut child)?;
        }

        parent.children.push(child);
        cursor = next;
    }

    Ok(())
}

/// Build the raw box tree under a synthetic root spanning the whole input.
pub fn parse_tree<R: Read + Seek>(r: &mut R) -> Result<RootBox> {
    let len = r.seek(SeekFrom::End(0))?;
    let mut root = RootBox::new(len);
    parse_children(r, &mut root.node)?;
    Ok(root)
}

/// Parse the input and aggregate its media summary. Primary entry point.
pub fn parse<R: Read + Seek>(r: &mut R) -> Result<MediaInfo> {
    let root = parse_tree(r)?;
    MediaInfo::from_tree(r, &root)
}
