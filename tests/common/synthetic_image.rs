/// Generates an image split into two flat vertical half-planes.
pub fn half_plane_u8(width: usize, height: usize, split_x: usize, left: u8, right: u8) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(split_x <= width, "split must lie within the image");

    let mut img = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            img[y * width + x] = if x < split_x { left } else { right };
        }
    }
    img
}

/// Generates an image whose left half is flat black and whose right half is
/// a vertical stripe pattern alternating between 0 and 255 every column.
///
/// The flat half carries no texture at all, so descriptors computed
/// sufficiently far from the seam and with in-range windows are exactly zero.
pub fn flat_and_stripes_u8(width: usize, height: usize, split_x: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(split_x <= width, "split must lie within the image");

    let mut img = vec![0u8; width * height];
    for y in 0..height {
        for x in split_x..width {
            img[y * width + x] = if (x - split_x) % 2 == 0 { 0 } else { 255 };
        }
    }
    img
}

/// Generates a deterministic textured pattern with mixed spatial frequencies.
pub fn textured_u8(width: usize, height: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");

    let mut img = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let v = (x * 13 + y * 29 + (x * y) % 47) % 256;
            img[y * width + x] = v as u8;
        }
    }
    img
}
