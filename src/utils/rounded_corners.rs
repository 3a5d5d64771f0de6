use egui::{CornerRadius, Pos2, Rect};

/// Converts a radius in points to egui's byte radius, clamped so that two
/// adjacent corners never overlap.
pub(crate) fn corner_radius_for(rect: Rect, radius: f32) -> u8 {
    let limit = rect.width().min(rect.height()) / 2.0;
    radius.min(limit).max(0.0).round().min(u8::MAX as f32) as u8
}

/// Point-in-rounded-rectangle test.
///
/// Edges are half-open: the left and top edges are inside, the right and
/// bottom edges are not. Two rectangles sharing an edge therefore never both
/// claim a point on it.
pub(crate) fn rounded_rect_contains(rect: Rect, radii: CornerRadius, point: Pos2) -> bool {
    if !(point.x >= rect.min.x && point.x < rect.max.x && point.y >= rect.min.y && point.y < rect.max.y)
    {
        return false;
    }

    let corners = [
        (radii.nw, rect.left_top(), 1.0, 1.0),
        (radii.ne, rect.right_top(), -1.0, 1.0),
        (radii.sw, rect.left_bottom(), 1.0, -1.0),
        (radii.se, rect.right_bottom(), -1.0, -1.0),
    ];

    for (radius, corner, dx, dy) in corners {
        if radius == 0 {
            continue;
        }
        let r = radius as f32;
        let center = Pos2::new(corner.x + dx * r, corner.y + dy * r);
        let in_corner_x = if dx > 0.0 { point.x < center.x } else { point.x > center.x };
        let in_corner_y = if dy > 0.0 { point.y < center.y } else { point.y > center.y };
        if in_corner_x && in_corner_y && point.distance_sq(center) > r * r {
            return false;
        }
    }

    true
}
