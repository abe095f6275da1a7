use glam::{Mat4, Quat, Vec3};

/// Composes a local transform as `T * R * S`.
///
/// `rotation` is a quaternion in `[x, y, z, w]` order, the layout glTF uses.
pub fn compose_trs(translation: [f32; 3], rotation: [f32; 4], scale: [f32; 3]) -> Mat4 {
    let t = Mat4::from_translation(Vec3::from_array(translation));
    let r = Mat4::from_quat(Quat::from_array(rotation));
    let s = Mat4::from_scale(Vec3::from_array(scale));
    t * r * s
}

/// Matrix stored column by column (glTF `matrix`, glam's native layout)
pub fn from_column_major(columns: [[f32; 4]; 4]) -> Mat4 {
    Mat4::from_cols_array_2d(&columns)
}

/// Matrix stored row by row, translation in the last column of each row
pub fn from_row_major(rows: [[f32; 4]; 4]) -> Mat4 {
    Mat4::from_cols_array_2d(&rows).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_trs() {
        let m = compose_trs([0.0; 3], [0.0, 0.0, 0.0, 1.0], [1.0; 3]);
        assert_eq!(m, Mat4::IDENTITY);
    }

    #[test]
    fn test_trs_order() {
        // Scale first, then rotate 90 degrees about Z, then translate
        let half = std::f32::consts::FRAC_1_SQRT_2;
        let m = compose_trs([10.0, 0.0, 0.0], [0.0, 0.0, half, half], [2.0, 2.0, 2.0]);
        let p = m.transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(10.0, 2.0, 0.0), 1e-5), "{p:?}");
    }

    #[test]
    fn test_row_major_translation() {
        let rows = [
            [1.0, 0.0, 0.0, 4.0],
            [0.0, 1.0, 0.0, 5.0],
            [0.0, 0.0, 1.0, 6.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        let m = from_row_major(rows);
        assert_eq!(m.w_axis.truncate(), Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_column_major_translation() {
        let cols = [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [4.0, 5.0, 6.0, 1.0],
        ];
        let m = from_column_major(cols);
        assert_eq!(m.transform_point3(Vec3::ZERO), Vec3::new(4.0, 5.0, 6.0));
    }
}
