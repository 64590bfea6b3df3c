//! Integer-cm geometry helpers shared by the editor and the packer.

/// Rounds `v` to the nearest multiple of `step` (half away from zero).
/// Steps below 2 disable the raster.
pub fn snap_to_grid(v: i32, step: i32) -> i32 {
    if step < 2 {
        return v;
    }
    let half = step / 2;
    if v >= 0 {
        (v + half) / step * step
    } else {
        -((-v + half) / step * step)
    }
}

/// The three allowed Y lanes for an object of height `h`: front edge,
/// centred, back edge. Returns the nearest by absolute distance, ties
/// toward the lower value.
pub fn snap_axis_y(y: i32, h: i32, width: i32) -> i32 {
    let lanes = [0, (width - h) / 2, width - h];
    let mut best = lanes[0];
    let mut best_dist = (y - lanes[0]).abs();
    for &lane in &lanes[1..] {
        let dist = (y - lane).abs();
        if dist < best_dist {
            best = lane;
            best_dist = dist;
        }
    }
    best
}

/// Clamps a top-left corner so the w x h rectangle stays inside the bed.
pub fn clamp_into(x: i32, y: i32, w: i32, h: i32, length: i32, width: i32) -> (i32, i32) {
    (x.min(length - w).max(0), y.min(width - h).max(0))
}

/// Clamp + grid snap for the X axis. When the snap rounds past the back
/// wall the value is floored back onto the raster inside the bed, so both
/// the containment and the grid invariant hold.
pub fn snap_x_into(x: i32, w: i32, step: i32, length: i32) -> i32 {
    let max_x = (length - w).max(0);
    let snapped = snap_to_grid(x.min(max_x).max(0), step);
    if snapped > max_x {
        max_x / step * step
    } else {
        snapped
    }
}

/// Axis-aligned bounding-box width of a w x h rectangle rotated by
/// `angle` degrees. Only used to measure geometry coming back from the
/// rendering surface; stored objects carry no angle.
pub fn rotated_bbox_w(w: f64, h: f64, angle: f64) -> f64 {
    let theta = angle.to_radians();
    (w * theta.cos()).abs() + (h * theta.sin()).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid_rounds_half_up() {
        assert_eq!(snap_to_grid(117, 10), 120);
        assert_eq!(snap_to_grid(114, 10), 110);
        assert_eq!(snap_to_grid(115, 10), 120);
        assert_eq!(snap_to_grid(0, 10), 0);
    }

    #[test]
    fn test_snap_to_grid_small_step_is_identity() {
        assert_eq!(snap_to_grid(117, 1), 117);
        assert_eq!(snap_to_grid(117, 0), 117);
    }

    #[test]
    fn test_snap_axis_y_lanes() {
        // 245-wide bed, Euro longitudinal: lanes are 0, 82, 165.
        assert_eq!(snap_axis_y(5, 80, 245), 0);
        assert_eq!(snap_axis_y(70, 80, 245), 82);
        assert_eq!(snap_axis_y(160, 80, 245), 165);
    }

    #[test]
    fn test_snap_axis_y_tie_prefers_lower() {
        // Lanes 0, 10, 20: y=5 is equidistant from 0 and 10.
        assert_eq!(snap_axis_y(5, 80, 100), 0);
        assert_eq!(snap_axis_y(15, 80, 100), 10);
    }

    #[test]
    fn test_clamp_into_bounds() {
        assert_eq!(clamp_into(-20, -5, 120, 80, 1360, 245), (0, 0));
        assert_eq!(clamp_into(2000, 400, 120, 80, 1360, 245), (1240, 165));
        assert_eq!(clamp_into(400, 82, 120, 80, 1360, 245), (400, 82));
    }

    #[test]
    fn test_snap_x_into_keeps_containment() {
        // Back wall at 1360 - 135 = 1225; plain snap would round to 1230.
        assert_eq!(snap_x_into(1224, 135, 10, 1360), 1220);
        assert_eq!(snap_x_into(-50, 120, 10, 1360), 0);
        assert_eq!(snap_x_into(117, 120, 10, 1360), 120);
    }

    #[test]
    fn test_rotated_bbox_w() {
        assert!((rotated_bbox_w(120.0, 80.0, 0.0) - 120.0).abs() < 1e-9);
        assert!((rotated_bbox_w(120.0, 80.0, 90.0) - 80.0).abs() < 1e-9);
        assert!((rotated_bbox_w(120.0, 80.0, 180.0) - 120.0).abs() < 1e-9);
        // 45 degrees: (120 + 80) / sqrt(2)
        let expect = 200.0 / std::f64::consts::SQRT_2;
        assert!((rotated_bbox_w(120.0, 80.0, 45.0) - expect).abs() < 1e-9);
    }
}
