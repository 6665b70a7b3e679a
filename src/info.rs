use crate::boxes::{BoxNode, RootBox};
use crate::fields::{Hdlr, Mdhd, Mvhd, Tkhd};
use crate::parser::{ParseError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{Read, Seek};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Sound,
}

/// One recognized track, in on-disk order.
#[derive(Debug, Clone, Serialize)]
pub struct TrackSummary {
    pub kind: TrackKind,
    pub name: String,
    pub duration: u32,
    pub volume: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_rate: Option<u32>,
}

/// Media summary of one parsed file: picture dimensions from the video
/// track, sampling rate from the sound track, timing from the movie
/// header. Fields stay `None` when the file carries no matching box.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MediaInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_sampling_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modification_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tracks: Vec<TrackSummary>,
}

impl MediaInfo {
    /// Aggregation pass over a finished tree. Each `mvhd` and each
    /// recognized `trak` contributes exactly once.
    pub fn from_tree<R: Read + Seek>(r: &mut R, root: &RootBox) -> Result<Self> {
        let mut info = MediaInfo::default();

        for moov in root.node.all(b"moov") {
            if let Some(node) = moov.first(b"mvhd") {
                let mvhd = Mvhd::decode(r, node)?;
                if mvhd.time_scale == 0 {
                    return Err(ParseError::ZeroTimeScale);
                }
                debug!(
                    time_scale = mvhd.time_scale,
                    duration = mvhd.duration,
                    "movie header"
                );
                info.creation_time = Some(mvhd.creation_time);
                info.modification_time = Some(mvhd.modification_time);
                info.duration = Some(Duration::from_secs(u64::from(
                    mvhd.duration / mvhd.time_scale,
                )));
            }

            for trak in moov.all(b"trak") {
                info.add_track(r, trak)?;
            }
        }

        Ok(info)
    }

    /// Tracks missing their `tkhd` or `mdia/hdlr` are skipped; handler
    /// types other than vide/soun are ignored.
    fn add_track<R: Read + Seek>(&mut self, r: &mut R, trak: &BoxNode) -> Result<()> {
        let (Some(tkhd_node), Some(mdia)) = (trak.first(b"tkhd"), trak.first(b"mdia")) else {
            return Ok(());
        };
        let Some(hdlr_node) = mdia.first(b"hdlr") else {
            return Ok(());
        };

        let tkhd = Tkhd::decode(r, tkhd_node)?;
        let hdlr = Hdlr::decode(r, hdlr_node)?;

        match &hdlr.handler_type.0 {
            b"vide" => {
                debug!(width = tkhd.width, height = tkhd.height, "video track");
                self.width = Some(tkhd.width);
                self.height = Some(tkhd.height);
                self.tracks.push(TrackSummary {
                    kind: TrackKind::Video,
                    name: hdlr.name,
                    duration: tkhd.duration,
                    volume: tkhd.volume,
                    width: Some(tkhd.width),
                    height: Some(tkhd.height),
                    sampling_rate: None,
                });
            }
            b"soun" => {
                let Some(mdhd_node) = mdia.first(b"mdhd") else {
                    return Ok(());
                };
                let mdhd = Mdhd::decode(r, mdhd_node)?;
                debug!(sampling_rate = mdhd.time_scale, "sound track");
                self.sound_sampling_rate = Some(mdhd.time_scale);
                self.tracks.push(TrackSummary {
                    kind: TrackKind::Sound,
                    name: hdlr.name,
                    duration: tkhd.duration,
                    volume: tkhd.volume,
                    width: None,
                    height: None,
                    sampling_rate: Some(mdhd.time_scale),
                });
            }
            _ => {}
        }

        Ok(())
    }
}
