use std::cmp::PartialEq;
use std::ops::{Index, Mul, Neg};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn norm(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Try to scale this vector to unit length. Returns Err if the norm is zero.
    pub fn try_normalized(&self) -> Result<Self, String> {
        let norm_sq = self.x * self.x + self.y * self.y + self.z * self.z;
        if norm_sq == 0.0 {
            return Err("Vector norm cannot be zero".to_string());
        }
        let norm = norm_sq.sqrt();
        Ok(Self {
            x: self.x / norm,
            y: self.y / norm,
            z: self.z / norm,
        })
    }
}

impl Default for Vector3 {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0 }
    }
}

impl Index<usize> for Vector3 {
    type Output = f32;

    #[inline]
    fn index(&self, row: usize) -> &Self::Output {
        match row {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("index out of bounds: the len is 3 but the index is {}", row),
        }
    }
}

impl Mul<f32> for Vector3 {
    type Output = Vector3;

    fn mul(self, scalar: f32) -> Vector3 {
        Vector3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

/// One of the three standard coordinate axes. The dropdown in the controls
/// resolves its string label to this enum at the event boundary, so the math
/// below only ever sees an axis vector with unit norm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub const fn unit_vector(self) -> Vector3 {
        match self {
            Axis::X => Vector3::new(1.0, 0.0, 0.0),
            Axis::Y => Vector3::new(0.0, 1.0, 0.0),
            Axis::Z => Vector3::new(0.0, 0.0, 1.0),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }

    pub fn from_label(label: &str) -> Option<Axis> {
        match label {
            "X" => Some(Axis::X),
            "Y" => Some(Axis::Y),
            "Z" => Some(Axis::Z),
            _ => None,
        }
    }
}

/// 3x3 rotation matrix, row-major. Orthonormal with determinant +1 whenever
/// it was built from a non-zero axis and a finite angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix(pub [[f32; 3]; 3]);

impl RotationMatrix {
    /// Rotation by `angle` radians about `axis` (normalized internally).
    /// Panics if the axis has zero norm; use [`Self::try_from_axis_angle`]
    /// when the axis is not statically known to be non-zero.
    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Self {
        Self::try_from_axis_angle(axis, angle).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Rotation by `angle` radians about `axis`. Returns Err if the axis has
    /// zero norm.
    ///
    /// Uses the quaternion-style parameterization `a = cos(angle/2)`,
    /// `(b, c, d) = -axis * sin(angle/2)`. The negated axis fixes the
    /// handedness: a positive angle reads clockwise when sighting along
    /// +axis, so the result equals the textbook matrix evaluated at -angle.
    pub fn try_from_axis_angle(axis: Vector3, angle: f32) -> Result<Self, String> {
        let unit = axis
            .try_normalized()
            .map_err(|_| "Rotation axis norm cannot be zero".to_string())?;
        let half = angle / 2.0;
        let a = half.cos();
        let scaled = -unit * half.sin();
        let (b, c, d) = (scaled.x, scaled.y, scaled.z);
        Ok(Self([
            [
                a * a + b * b - c * c - d * d,
                2.0 * (b * c - a * d),
                2.0 * (b * d + a * c),
            ],
            [
                2.0 * (b * c + a * d),
                a * a + c * c - b * b - d * d,
                2.0 * (c * d - a * b),
            ],
            [
                2.0 * (b * d - a * c),
                2.0 * (c * d + a * b),
                a * a + d * d - b * b - c * c,
            ],
        ]))
    }

    pub fn rotate_vector(&self, v: Vector3) -> Vector3 {
        let m = &self.0;
        Vector3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Combined matrix for a sequence of rotations. The first element of the
    /// slice is applied first: `compose(&[a, b]) == b * a`, so
    /// `compose(&[a, b]).rotate_vector(v) == b.rotate_vector(a.rotate_vector(v))`.
    /// Rotation composition is non-commutative; callers must not reorder.
    pub fn compose(rotations: &[RotationMatrix]) -> RotationMatrix {
        rotations
            .iter()
            .fold(RotationMatrix::default(), |acc, r| *r * acc)
    }
}

impl Default for RotationMatrix {
    fn default() -> Self {
        Self([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }
}

impl Index<usize> for RotationMatrix {
    type Output = [f32; 3];

    #[inline]
    fn index(&self, row: usize) -> &Self::Output {
        &self.0[row]
    }
}

impl Mul for RotationMatrix {
    type Output = RotationMatrix;

    fn mul(self, other: RotationMatrix) -> RotationMatrix {
        let mut result = RotationMatrix([[0.0; 3]; 3]);
        for i in 0..3 {
            for j in 0..3 {
                result.0[i][j] = 0.0;
                for k in 0..3 {
                    result.0[i][j] += self[i][k] * other[k][j];
                }
            }
        }
        result
    }
}

/// A coordinate frame: three orthogonal unit basis vectors, the columns of a
/// 3x3 matrix. The default frame is the identity basis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: Vector3,
    pub y: Vector3,
    pub z: Vector3,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            x: Axis::X.unit_vector(),
            y: Axis::Y.unit_vector(),
            z: Axis::Z.unit_vector(),
        }
    }
}

impl Frame {
    pub fn columns(&self) -> [Vector3; 3] {
        [self.x, self.y, self.z]
    }

    /// Apply a rotation to every basis vector: `R · frame` with the frame as
    /// a column matrix.
    pub fn rotated(&self, r: &RotationMatrix) -> Frame {
        Frame {
            x: r.rotate_vector(self.x),
            y: r.rotate_vector(self.y),
            z: r.rotate_vector(self.z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-5;

    fn assert_near(actual: f32, expected: f32, what: &str) {
        assert!(
            (actual - expected).abs() < TOL,
            "{}: expected {}, got {}",
            what,
            expected,
            actual
        );
    }

    fn assert_matrix_near(actual: &RotationMatrix, expected: &[[f32; 3]; 3]) {
        for i in 0..3 {
            for j in 0..3 {
                assert_near(actual[i][j], expected[i][j], &format!("entry [{}][{}]", i, j));
            }
        }
    }

    fn assert_vector_near(actual: Vector3, expected: Vector3) {
        for i in 0..3 {
            assert_near(actual[i], expected[i], &format!("component {}", i));
        }
    }

    fn transposed(m: &RotationMatrix) -> RotationMatrix {
        let mut t = RotationMatrix([[0.0; 3]; 3]);
        for i in 0..3 {
            for j in 0..3 {
                t.0[i][j] = m[j][i];
            }
        }
        t
    }

    fn determinant(m: &RotationMatrix) -> f32 {
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    fn identity() -> [[f32; 3]; 3] {
        [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
    }

    #[test]
    fn vector_norm_and_normalization() {
        let v = Vector3::new(3.0, 0.0, 4.0);
        assert_near(v.norm(), 5.0, "norm");
        let unit = v.try_normalized().unwrap();
        assert_near(unit.norm(), 1.0, "unit norm");
        assert_vector_near(unit, Vector3::new(0.6, 0.0, 0.8));
    }

    #[test]
    fn zero_vector_cannot_be_normalized() {
        assert!(Vector3::default().try_normalized().is_err());
    }

    #[test]
    fn axis_labels_round_trip() {
        for axis in Axis::ALL {
            assert_eq!(Axis::from_label(axis.label()), Some(axis));
            assert_near(axis.unit_vector().norm(), 1.0, "axis unit norm");
        }
        assert_eq!(Axis::from_label("W"), None);
    }

    #[test]
    fn orthonormal_with_unit_determinant() {
        let axes = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(1.0, -2.0, 0.5),
        ];
        let angles_deg = [0.0_f32, 30.0, 45.0, 90.0, 137.0, 180.0, 270.0, 360.0];
        for axis in axes {
            for angle_deg in angles_deg {
                let r = RotationMatrix::from_axis_angle(axis, angle_deg.to_radians());
                let rrt = r * transposed(&r);
                assert_matrix_near(&rrt, &identity());
                assert_near(determinant(&r), 1.0, "determinant");
            }
        }
    }

    #[test]
    fn zero_angle_is_exact_identity() {
        for axis in Axis::ALL {
            let r = RotationMatrix::from_axis_angle(axis.unit_vector(), 0.0);
            assert_eq!(r.0, identity());
        }
    }

    #[test]
    fn full_turn_is_identity() {
        for axis in Axis::ALL {
            let r = RotationMatrix::from_axis_angle(axis.unit_vector(), 360.0_f32.to_radians());
            assert_matrix_near(&r, &identity());
            let r =
                RotationMatrix::from_axis_angle(axis.unit_vector(), 2.0 * std::f32::consts::PI);
            assert_matrix_near(&r, &identity());
        }
    }

    #[test]
    fn axis_is_normalized_before_use() {
        let from_unit = RotationMatrix::from_axis_angle(Vector3::new(1.0, 0.0, 0.0), 1.2);
        let from_scaled = RotationMatrix::from_axis_angle(Vector3::new(2.0, 0.0, 0.0), 1.2);
        assert_matrix_near(&from_scaled, &from_unit.0);
    }

    #[test]
    fn zero_axis_is_rejected() {
        assert!(RotationMatrix::try_from_axis_angle(Vector3::default(), 1.0).is_err());
    }

    #[test]
    fn handedness_locked_to_negated_axis_convention() {
        // With (b,c,d) = -axis*sin(angle/2), a 90 degree turn about X sends
        // Y to -Z, not +Z.
        let r = RotationMatrix::from_axis_angle(Axis::X.unit_vector(), 90.0_f32.to_radians());
        let rotated = r.rotate_vector(Axis::Y.unit_vector());
        assert_vector_near(rotated, Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn rotations_do_not_commute() {
        let rx = RotationMatrix::from_axis_angle(Axis::X.unit_vector(), 90.0_f32.to_radians());
        let ry = RotationMatrix::from_axis_angle(Axis::Y.unit_vector(), 90.0_f32.to_radians());
        let x_then_y = RotationMatrix::compose(&[rx, ry]);
        let y_then_x = RotationMatrix::compose(&[ry, rx]);
        let max_diff = (0..3)
            .flat_map(|i| (0..3).map(move |j| (i, j)))
            .map(|(i, j)| (x_then_y[i][j] - y_then_x[i][j]).abs())
            .fold(0.0_f32, f32::max);
        assert!(
            max_diff > 0.5,
            "expected 90 degree X/Y rotations to differ by order, max diff {}",
            max_diff
        );
    }

    #[test]
    fn compose_applies_first_element_first() {
        let a = RotationMatrix::from_axis_angle(Axis::Z.unit_vector(), 50.0_f32.to_radians());
        let b = RotationMatrix::from_axis_angle(Axis::X.unit_vector(), 120.0_f32.to_radians());
        let combined = RotationMatrix::compose(&[a, b]);
        let v = Vector3::new(0.3, -1.0, 0.7);
        let sequential = b.rotate_vector(a.rotate_vector(v));
        assert_vector_near(combined.rotate_vector(v), sequential);
        assert_matrix_near(&combined, &(b * a).0);
    }

    #[test]
    fn identity_stages_do_not_change_the_result() {
        let rx = RotationMatrix::from_axis_angle(Axis::X.unit_vector(), 90.0_f32.to_radians());
        let id = RotationMatrix::default();
        let combined = RotationMatrix::compose(&[rx, id, id]);
        assert_matrix_near(&combined, &rx.0);
    }

    #[test]
    fn default_frame_is_identity_basis() {
        let frame = Frame::default();
        assert_eq!(frame.x, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(frame.y, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(frame.z, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn frame_rotation_about_x() {
        let r = RotationMatrix::from_axis_angle(Axis::X.unit_vector(), 90.0_f32.to_radians());
        let rotated = Frame::default().rotated(&r);
        assert_vector_near(rotated.x, Vector3::new(1.0, 0.0, 0.0));
        assert_vector_near(rotated.y, Vector3::new(0.0, 0.0, -1.0));
        assert_vector_near(rotated.z, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn frame_is_unchanged_by_zero_angle_stage() {
        let r = RotationMatrix::from_axis_angle(Axis::Z.unit_vector(), 0.0);
        assert_eq!(Frame::default().rotated(&r), Frame::default());
    }

    // Reference matrices computed from the literal (b,c,d) = -axis*sin(angle/2)
    // parameterization; each equals the textbook axis-angle matrix at -angle.
    mod golden {
        use super::*;
        use serde::Deserialize;

        #[derive(Deserialize)]
        struct GoldenCase {
            axis: [f32; 3],
            angle_deg: f32,
            expected: [[f32; 3]; 3],
        }

        const GOLDEN_CASES: &str = r#"[
            {
                "axis": [1.0, 0.0, 0.0],
                "angle_deg": 90.0,
                "expected": [[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]]
            },
            {
                "axis": [0.0, 1.0, 0.0],
                "angle_deg": 90.0,
                "expected": [[0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]]
            },
            {
                "axis": [0.0, 0.0, 1.0],
                "angle_deg": 90.0,
                "expected": [[0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]
            },
            {
                "axis": [0.0, 0.0, 1.0],
                "angle_deg": 180.0,
                "expected": [[-1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 1.0]]
            },
            {
                "axis": [1.0, 1.0, 1.0],
                "angle_deg": 120.0,
                "expected": [[0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]]
            },
            {
                "axis": [1.0, 0.0, 0.0],
                "angle_deg": 45.0,
                "expected": [
                    [1.0, 0.0, 0.0],
                    [0.0, 0.70710678, 0.70710678],
                    [0.0, -0.70710678, 0.70710678]
                ]
            }
        ]"#;

        #[test]
        fn golden_reference_matrices() {
            let cases: Vec<GoldenCase> =
                serde_json::from_str(GOLDEN_CASES).expect("golden fixture should parse");
            assert!(!cases.is_empty());
            for case in cases {
                let axis = Vector3::new(case.axis[0], case.axis[1], case.axis[2]);
                let r = RotationMatrix::from_axis_angle(axis, case.angle_deg.to_radians());
                assert_matrix_near(&r, &case.expected);
            }
        }
    }
}
