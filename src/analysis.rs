// Copyright 2019-2020 koushiro. Licensed under MIT.

//! Timestamp-gap analysis: flags likely dropped frames by comparing
//! consecutive video-tag timestamps against the declared framerate.

use crate::amf0::Amf0Value;
use crate::tag::{FlvTag, FlvTagType, TagDetails};
use std::collections::BTreeMap;

/// Runs the timestamp-gap analyzer over `tags` in place, populating the
/// `analysis` field of video tags whose timestamp jump from the previous
/// video tag suggests dropped frames.
///
/// A no-op unless `metadata` declares a positive `framerate`.
pub fn analyze(tags: &mut [FlvTag], metadata: &BTreeMap<String, Amf0Value>) {
    let framerate = match metadata.get("framerate") {
        Some(Amf0Value::Number(f)) if *f > 0.0 => *f,
        _ => return,
    };

    let expected_interval = 1000.0 / framerate;
    let threshold = 2.0 * expected_interval;

    let mut previous_timestamp: Option<u32> = None;
    for tag in tags.iter_mut() {
        if !matches!(tag.tag_type, FlvTagType::Video) {
            continue;
        }

        if let Some(previous) = previous_timestamp {
            // Widen to i64 before subtracting so decreasing timestamps
            // (edited/spliced streams) don't wrap around as unsigned.
            let gap = i64::from(tag.timestamp) - i64::from(previous);
            if gap > 0 {
                let gap = gap as f64;
                if gap > threshold {
                    let dropped = (gap / expected_interval).round() as i64 - 1;
                    if dropped > 0 {
                        let message = format!(
                            "Timestamp jump of {}ms. Possible {} dropped frames.",
                            gap as i64, dropped
                        );
                        tracing::debug!(timestamp = tag.timestamp, %message, "dropped-frame analysis triggered");
                        tag.analysis = Some(message);
                    }
                }
            }
        }
        previous_timestamp = Some(tag.timestamp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::VideoDetails;

    fn video_tag(offset: usize, timestamp: u32) -> FlvTag {
        FlvTag {
            offset,
            tag_type: FlvTagType::Video,
            data_size: 1,
            timestamp,
            stream_id: 0,
            details: TagDetails::Video(VideoDetails::decode(&[0x17])),
            analysis: None,
        }
    }

    fn metadata_with_framerate(framerate: f64) -> BTreeMap<String, Amf0Value> {
        let mut m = BTreeMap::new();
        m.insert("framerate".to_string(), Amf0Value::Number(framerate));
        m
    }

    #[test]
    fn no_framerate_metadata_is_a_noop() {
        let mut tags = vec![video_tag(0, 0), video_tag(20, 160)];
        analyze(&mut tags, &BTreeMap::new());
        assert_eq!(tags[1].analysis, None);
    }

    #[test]
    fn detects_dropped_frames_from_spec_scenario() {
        // framerate=25.0 -> expected interval 40ms, threshold 80ms.
        let mut tags = vec![video_tag(0, 0), video_tag(20, 160)];
        analyze(&mut tags, &metadata_with_framerate(25.0));
        assert_eq!(
            tags[1].analysis.as_deref(),
            Some("Timestamp jump of 160ms. Possible 3 dropped frames.")
        );
    }

    #[test]
    fn small_gap_does_not_trigger_analysis() {
        let mut tags = vec![video_tag(0, 0), video_tag(20, 50)];
        analyze(&mut tags, &metadata_with_framerate(25.0));
        assert_eq!(tags[1].analysis, None);
    }

    #[test]
    fn decreasing_timestamp_does_not_panic_or_wrap() {
        let mut tags = vec![video_tag(0, 1000), video_tag(20, 100)];
        analyze(&mut tags, &metadata_with_framerate(25.0));
        assert_eq!(tags[1].analysis, None);
    }

    #[test]
    fn non_video_tags_are_ignored() {
        let mut tags = vec![video_tag(0, 0)];
        tags.push(FlvTag {
            offset: 20,
            tag_type: FlvTagType::Audio,
            data_size: 1,
            timestamp: 160,
            stream_id: 0,
            details: TagDetails::Unknown,
            analysis: None,
        });
        tags.push(video_tag(40, 160));
        analyze(&mut tags, &metadata_with_framerate(25.0));
        assert_eq!(tags[1].analysis, None);
        assert_eq!(
            tags[2].analysis.as_deref(),
            Some("Timestamp jump of 160ms. Possible 3 dropped frames.")
        );
    }
}
