//! Region tools on binary masks: 4-connected flood fill, component
//! selection and foreground centroids.
use crate::image::{BinaryMask, ImageView};
use crate::types::Point2D;

/// Flood the 4-connected region of pixels sharing the seed's value with
/// `value`. Returns the number of pixels changed; a seed that already holds
/// `value` changes nothing.
pub fn flood_fill(mask: &mut BinaryMask, seed: Point2D, value: bool) -> usize {
    let (w, h) = (mask.width(), mask.height());
    if seed.x >= w || seed.y >= h || mask.get(seed.x, seed.y) == value {
        return 0;
    }
    let target = !value;
    let mut changed = 0usize;
    let mut stack = vec![seed];
    mask.set(seed.x, seed.y, value);
    while let Some(p) = stack.pop() {
        changed += 1;
        let mut visit = |x: usize, y: usize, stack: &mut Vec<Point2D>| {
            if mask.get(x, y) == target {
                mask.set(x, y, value);
                stack.push(Point2D::new(x, y));
            }
        };
        if p.x > 0 {
            visit(p.x - 1, p.y, &mut stack);
        }
        if p.x + 1 < w {
            visit(p.x + 1, p.y, &mut stack);
        }
        if p.y > 0 {
            visit(p.x, p.y - 1, &mut stack);
        }
        if p.y + 1 < h {
            visit(p.x, p.y + 1, &mut stack);
        }
    }
    changed
}

/// New mask holding only the 4-connected foreground component that contains
/// `seed` (empty if the seed is background).
pub fn select_component(mask: &BinaryMask, seed: Point2D) -> BinaryMask {
    let mut marker = mask.clone();
    flood_fill(&mut marker, seed, false);
    // Pixels that were foreground and got cleared are exactly the component.
    BinaryMask::from_fn(mask.width(), mask.height(), |x, y| {
        mask.get(x, y) && !marker.get(x, y)
    })
}

/// Mean position of all foreground pixels, rounded to the nearest pixel.
pub fn foreground_centroid(mask: &BinaryMask) -> Option<Point2D> {
    let mut sx = 0u64;
    let mut sy = 0u64;
    let mut n = 0u64;
    for (y, row) in mask.rows().enumerate() {
        for (x, &v) in row.iter().enumerate() {
            if v {
                sx += x as u64;
                sy += y as u64;
                n += 1;
            }
        }
    }
    if n == 0 {
        return None;
    }
    let cx = (sx as f64 / n as f64).round() as usize;
    let cy = (sy as f64 / n as f64).round() as usize;
    Some(Point2D::new(cx, cy))
}

/// Closest foreground pixel to `target` (Euclidean, ties broken in row-major
/// order). Returns `target` itself when it is foreground.
pub fn nearest_foreground(mask: &BinaryMask, target: Point2D) -> Option<Point2D> {
    if target.x < mask.width() && target.y < mask.height() && mask.get(target.x, target.y) {
        return Some(target);
    }
    let mut best: Option<(u64, Point2D)> = None;
    for (y, row) in mask.rows().enumerate() {
        for (x, &v) in row.iter().enumerate() {
            if !v {
                continue;
            }
            let dx = x.abs_diff(target.x) as u64;
            let dy = y.abs_diff(target.y) as u64;
            let d2 = dx * dx + dy * dy;
            if best.map_or(true, |(bd, _)| d2 < bd) {
                best = Some((d2, Point2D::new(x, y)));
            }
        }
    }
    best.map(|(_, p)| p)
}
