//! Minimal flattened PSD writer: 8-bit RGB, one composite image, no layers.
//!
//! Layout of the file (all integers big-endian):
//!
//! | section              | content                                         |
//! |----------------------|-------------------------------------------------|
//! | header (26 bytes)    | `8BPS`, version 1, 6 zero bytes, channels,       |
//! |                      | height, width, depth, color mode                |
//! | color mode data      | length 0                                        |
//! | image resources      | length 0                                        |
//! | layer and mask info  | length 0                                        |
//! | image data           | compression 0 (raw), then planes R, G, B        |

const SIGNATURE: &[u8; 4] = b"8BPS";
const VERSION: u16 = 1;
const CHANNELS: u16 = 3;
const DEPTH: u16 = 8;
const MODE_RGB: u16 = 3;
const RAW: u16 = 0;

/// Largest width or height a version 1 document may declare.
pub const MAX_SIDE: u32 = 30_000;

pub fn encode_rgb(width: u32, height: u32, pixels: &[[u8; 3]]) -> Result<Vec<u8>, String> {
    if width == 0 || height == 0 || width > MAX_SIDE || height > MAX_SIDE {
        return Err(format!("{width}x{height} is outside 1..={MAX_SIDE}"));
    }
    let count = width as usize * height as usize;
    if pixels.len() != count {
        return Err(format!("expected {count} pixels, got {}", pixels.len()));
    }

    let mut out = Vec::with_capacity(26 + 3 * 4 + 2 + 3 * count);
    out.extend_from_slice(SIGNATURE);
    out.extend_from_slice(&VERSION.to_be_bytes());
    out.extend_from_slice(&[0u8; 6]);
    out.extend_from_slice(&CHANNELS.to_be_bytes());
    out.extend_from_slice(&height.to_be_bytes());
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&DEPTH.to_be_bytes());
    out.extend_from_slice(&MODE_RGB.to_be_bytes());
    for _ in 0..3 {
        out.extend_from_slice(&0u32.to_be_bytes());
    }
    out.extend_from_slice(&RAW.to_be_bytes());
    for channel in 0..3 {
        out.extend(pixels.iter().map(|p| p[channel]));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_planes() {
        let px = [[1, 2, 3], [4, 5, 6]];
        let out = encode_rgb(2, 1, &px).unwrap();
        assert_eq!(&out[..4], b"8BPS");
        assert_eq!(&out[4..6], &[0, 1]);
        assert_eq!(&out[12..14], &[0, 3]);
        assert_eq!(&out[14..18], &1u32.to_be_bytes());
        assert_eq!(&out[18..22], &2u32.to_be_bytes());
        assert_eq!(&out[22..26], &[0, 8, 0, 3]);
        // three empty sections, raw compression, then planar data
        assert_eq!(&out[26..40], &[0; 14]);
        assert_eq!(&out[40..], &[1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn rejects_bad_sizes() {
        assert!(encode_rgb(0, 1, &[]).is_err());
        assert!(encode_rgb(MAX_SIDE + 1, 1, &[]).is_err());
        assert!(encode_rgb(2, 2, &[[0; 3]]).is_err());
    }
}
