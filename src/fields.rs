use crate::boxes::{BoxNode, FourCC};
use crate::parser::{ParseError, Result};
use crate::util::{dotted_notation_to_f, mp4_time};
use byteorder::{BigEndian, ReadBytesExt};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{Read, Seek, SeekFrom};

/// Movie header: overall timing for the presentation.
#[derive(Debug, Clone, Serialize)]
pub struct Mvhd {
    pub creation_time: DateTime<Utc>,
    pub modification_time: DateTime<Utc>,
    pub time_scale: u32,
    pub duration: u32,
}

impl Mvhd {
    pub fn decode<R: Read + Seek>(r: &mut R, node: &BoxNode) -> Result<Self> {
        // version + flags, then four contiguous u32 fields
        r.seek(SeekFrom::Start(node.payload_offset() + 4))?;
        let creation = r.read_u32::<BigEndian>()?;
        let modification = r.read_u32::<BigEndian>()?;
        let time_scale = r.read_u32::<BigEndian>()?;
        let duration = r.read_u32::<BigEndian>()?;

        Ok(Mvhd {
            creation_time: mp4_time(creation),
            modification_time: mp4_time(modification),
            time_scale,
            duration,
        })
    }
}

/// Track header: per-track timing, volume, and picture dimensions.
/// Volume is dotted 8.8, width and height dotted 16.16.
#[derive(Debug, Clone, Serialize)]
pub struct Tkhd {
    pub creation_time: DateTime<Utc>,
    pub modification_time: DateTime<Utc>,
    pub duration: u32,
    pub volume: f64,
    pub width: f64,
    pub height: f64,
}

impl Tkhd {
    pub fn decode<R: Read + Seek>(r: &mut R, node: &BoxNode) -> Result<Self> {
        let payload = node.payload_offset();

        r.seek(SeekFrom::Start(payload + 4))?;
        let creation = r.read_u32::<BigEndian>()?;
        let modification = r.read_u32::<BigEndian>()?;

        r.seek(SeekFrom::Start(payload + 20))?;
        let duration = r.read_u32::<BigEndian>()?;

        let mut volume = [0u8; 2];
        r.seek(SeekFrom::Start(payload + 36))?;
        r.read_exact(&mut volume)?;

        let mut dims = [0u8; 8];
        r.seek(SeekFrom::Start(payload + 76))?;
        r.read_exact(&mut dims)?;

        Ok(Tkhd {
            creation_time: mp4_time(creation),
            modification_time: mp4_time(modification),
            duration,
            volume: dotted_notation_to_f(&volume)?,
            width: dotted_notation_to_f(&dims[..4])?,
            height: dotted_notation_to_f(&dims[4..])?,
        })
    }
}

/// Media header: only the time scale is consumed here. For sound tracks
/// it doubles as the sampling rate.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Mdhd {
    pub time_scale: u32,
}

impl Mdhd {
    pub fn decode<R: Read + Seek>(r: &mut R, node: &BoxNode) -> Result<Self> {
        r.seek(SeekFrom::Start(node.payload_offset() + 12))?;
        Ok(Mdhd {
            time_scale: r.read_u32::<BigEndian>()?,
        })
    }
}

/// Handler reference: what kind of stream the enclosing track carries.
#[derive(Debug, Clone, Serialize)]
pub struct Hdlr {
    pub handler_type: FourCC,
    pub name: String,
}

impl Hdlr {
    pub fn decode<R: Read + Seek>(r: &mut R, node: &BoxNode) -> Result<Self> {
        let payload = node.payload_offset();

        r.seek(SeekFrom::Start(payload + 8))?;
        let mut handler = [0u8; 4];
        r.read_exact(&mut handler)?;

        // name is a null-terminated byte string; running into the box end
        // without a terminator is a short read
        r.seek(SeekFrom::Start(payload + 24))?;
        let mut name = Vec::new();
        let mut pos = payload + 24;
        loop {
            if pos >= node.end_offset() {
                return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
            }
            match r.read_u8()? {
                0 => break,
                b => name.push(b),
            }
            pos += 1;
        }

        Ok(Hdlr {
            handler_type: FourCC(handler),
            name: String::from_utf8_lossy(&name).into_owned(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StscEntry {
    pub first_chunk: u32,
    pub samples_per_chunk: u32,
    pub sample_desc_index: u32,
}

/// Sample-to-chunk table.
#[derive(Debug, Clone, Serialize)]
pub struct Stsc {
    pub entries: Vec<StscEntry>,
}

impl Stsc {
    pub fn decode<R: Read + Seek>(r: &mut R, node: &BoxNode) -> Result<Self> {
        r.seek(SeekFrom::Start(node.payload_offset() + 4))?;
        let entry_count = r.read_u32::<BigEndian>()?;

        let mut entries = Vec::new();
        for _ in 0..entry_count {
            entries.push(StscEntry {
                first_chunk: r.read_u32::<BigEndian>()?,
                samples_per_chunk: r.read_u32::<BigEndian>()?,
                sample_desc_index: r.read_u32::<BigEndian>()?,
            });
        }

        Ok(Stsc { entries })
    }
}

/// Chunk offset table.
#[derive(Debug, Clone, Serialize)]
pub struct Stco {
    pub chunk_offsets: Vec<u32>,
}

impl Stco {
    pub fn decode<R: Read + Seek>(r: &mut R, node: &BoxNode) -> Result<Self> {
        r.seek(SeekFrom::Start(node.payload_offset() + 4))?;
        let entry_count = r.read_u32::<BigEndian>()?;

        let mut chunk_offsets = Vec::new();
        for _ in 0..entry_count {
            chunk_offsets.push(r.read_u32::<BigEndian>()?);
        }

        Ok(Stco { chunk_offsets })
    }
}

/// Decoded fields of one recognized box.
///
/// Dispatch is strict: a tag outside the known set is an error. The tree
/// builder never takes this path for unrecognized boxes; they simply stay
/// undecoded leaves.
#[derive(Debug, Clone, Serialize)]
pub enum BoxData {
    Mvhd(Mvhd),
    Tkhd(Tkhd),
    Mdhd(Mdhd),
    Hdlr(Hdlr),
    Stsc(Stsc),
    Stco(Stco),
}

impl BoxData {
    pub fn decode<R: Read + Seek>(r: &mut R, node: &BoxNode) -> Result<Self> {
        match &node.header.typ.0 {
            b"mvhd" => Ok(BoxData::Mvhd(Mvhd::decode(r, node)?)),
            b"tkhd" => Ok(BoxData::Tkhd(Tkhd::decode(r, node)?)),
            b"mdhd" => Ok(BoxData::Mdhd(Mdhd::decode(r, node)?)),
            b"hdlr" => Ok(BoxData::Hdlr(Hdlr::decode(r, node)?)),
            b"stsc" => Ok(BoxData::Stsc(Stsc::decode(r, node)?)),
            b"stco" => Ok(BoxData::Stco(Stco::decode(r, node)?)),
            _ => Err(ParseError::UnknownBoxType(node.header.typ)),
        }
    }
}
