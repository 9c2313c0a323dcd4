use crate::capture::Frame;

/// Rectangle within a captured frame, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// What happens to a frame between grab and save.
///
/// The cycle transition rule is shared by every dispatcher variant; only
/// this post-capture step differs, so it is selected at construction.
#[derive(Debug, Clone)]
pub enum SavePolicy {
    /// Persist every position, frame untouched.
    SaveAll,
    /// Crop each frame to a fixed region and drop one position entirely.
    CropAndSkip {
        region: CropRegion,
        skip_position: u8,
    },
}

impl SavePolicy {
    /// Returns the frame to persist, or `None` when this position is
    /// dropped. The cycle counter has already moved by the time this
    /// runs; a skipped position still consumed its sequence number.
    pub fn apply(&self, position: u8, frame: Frame) -> Option<Frame> {
        match self {
            SavePolicy::SaveAll => Some(frame),
            SavePolicy::CropAndSkip {
                region,
                skip_position,
            } => {
                if position == *skip_position {
                    return None;
                }
                Some(crop(frame, *region))
            }
        }
    }
}

/// Copy out a sub-rectangle, clamped to the frame bounds.
fn crop(frame: Frame, region: CropRegion) -> Frame {
    let x = region.x.min(frame.width);
    let y = region.y.min(frame.height);
    let width = region.width.min(frame.width - x);
    let height = region.height.min(frame.height - y);

    let src_stride = frame.width as usize * Frame::BYTES_PER_PIXEL;
    let row_len = width as usize * Frame::BYTES_PER_PIXEL;

    let mut data = Vec::with_capacity(Frame::expected_len(width, height));
    for row in y..y + height {
        let start = row as usize * src_stride + x as usize * Frame::BYTES_PER_PIXEL;
        data.extend_from_slice(&frame.data[start..start + row_len]);
    }

    Frame {
        width,
        height,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_4x2() -> Frame {
        // Each pixel holds its index in all three channels
        let mut data = Vec::new();
        for idx in 0..8u8 {
            data.extend_from_slice(&[idx, idx, idx]);
        }
        Frame {
            width: 4,
            height: 2,
            data,
        }
    }

    #[test]
    fn test_save_all_passes_frame_through() {
        let frame = frame_4x2();
        let result = SavePolicy::SaveAll.apply(4, frame.clone());
        assert_eq!(result, Some(frame));
    }

    #[test]
    fn test_crop_and_skip_drops_configured_position() {
        let policy = SavePolicy::CropAndSkip {
            region: CropRegion {
                x: 0,
                y: 0,
                width: 2,
                height: 2,
            },
            skip_position: 4,
        };

        assert!(policy.apply(4, frame_4x2()).is_none());
        assert!(policy.apply(1, frame_4x2()).is_some());
        assert!(policy.apply(3, frame_4x2()).is_some());
    }

    #[test]
    fn test_crop_extracts_expected_pixels() {
        let policy = SavePolicy::CropAndSkip {
            region: CropRegion {
                x: 1,
                y: 1,
                width: 2,
                height: 1,
            },
            skip_position: 4,
        };

        let cropped = policy.apply(2, frame_4x2()).unwrap();
        assert_eq!(cropped.width, 2);
        assert_eq!(cropped.height, 1);
        // Bottom row of the 4x2 frame holds pixels 4..8; offset 1 wide 2
        assert_eq!(cropped.data, vec![5, 5, 5, 6, 6, 6]);
    }

    #[test]
    fn test_crop_clamps_oversized_region() {
        let policy = SavePolicy::CropAndSkip {
            region: CropRegion {
                x: 3,
                y: 0,
                width: 100,
                height: 100,
            },
            skip_position: 4,
        };

        let cropped = policy.apply(1, frame_4x2()).unwrap();
        assert_eq!(cropped.width, 1);
        assert_eq!(cropped.height, 2);
        assert_eq!(cropped.data.len(), Frame::expected_len(1, 2));
    }
}
