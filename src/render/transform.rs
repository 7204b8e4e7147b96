//! Hierarchical shape transforms.
//!
//! Each shape maps its child coordinate space into its parent's space with a
//! 3×3 affine matrix built from its `xfrm` parameters (ECMA-376 Part 1,
//! L.4.7.6). Effective transforms are the product of every ancestor's matrix,
//! outermost first, and are never mutated once built.

use std::f64::consts::TAU;
use std::ops::Mul;

use glam::{DMat3, DVec2, DVec3, dvec2};

use crate::model::Xfrm;
use crate::types::{Emu, Point, Scaler, SizeEmu};

/// An affine transform between two drawing coordinate spaces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform(DMat3);

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform(DMat3::IDENTITY);

    pub fn from_matrix(matrix: DMat3) -> Self {
        Transform(matrix)
    }

    pub fn matrix(&self) -> DMat3 {
        self.0
    }

    /// Slide EMU → output pixels
    pub fn root(scaler: &Scaler) -> Self {
        let s = 1.0 / scaler.emu_per_px;
        Transform(DMat3::from_scale(dvec2(s, s)))
    }

    /// Local transform of a shape.
    ///
    /// `bbox` is the child-space extent used when the shape has no `chExt`.
    /// Scale and translate happen in child space; flip and rotation happen
    /// about the centre of the placed box.
    pub fn for_shape(xfrm: &Xfrm, bbox: SizeEmu) -> Self {
        let ch_off = xfrm.ch_off.unwrap_or_default();
        let ch_ext = xfrm.ch_ext.unwrap_or(bbox);
        let (bx, by) = (ch_off.x.raw(), ch_off.y.raw());
        let (bx_, by_) = (xfrm.off.x.raw(), xfrm.off.y.raw());
        let (dx_, dy_) = (xfrm.ext.w.raw(), xfrm.ext.h.raw());

        // An empty child extent maps with unit scale
        let (sx, tx) = match xfrm.ext.w.checked_div(ch_ext.w) {
            Some(sx) => (sx, bx_ - sx * bx),
            None => (1.0, bx_),
        };
        let (sy, ty) = match xfrm.ext.h.checked_div(ch_ext.h) {
            Some(sy) => (sy, by_ - sy * by),
            None => (1.0, by_),
        };
        let t_st = DMat3::from_translation(dvec2(tx, ty)) * DMat3::from_scale(dvec2(sx, sy));

        let centre = dvec2(bx_ + dx_ / 2.0, by_ + dy_ / 2.0);
        let u = DMat3::from_translation(-centre);
        let u_inv = DMat3::from_translation(centre);
        let r = DMat3::from_angle(xfrm.rot.to_radians());
        let f = DMat3::from_diagonal(DVec3::new(
            if xfrm.flip_h { -1.0 } else { 1.0 },
            if xfrm.flip_v { -1.0 } else { 1.0 },
            1.0,
        ));
        let t_rf = u_inv * r * f * u;

        Transform(t_rf * t_st)
    }

    pub fn inverse(&self) -> Self {
        Transform(self.0.inverse())
    }

    pub fn transform_point(&self, pt: Point<Emu>) -> DVec2 {
        self.0.transform_point2(dvec2(pt.x.raw(), pt.y.raw()))
    }

    /// Split the linear part into a rotation and per-axis scale.
    ///
    /// `linear = rotation · upper-triangular(scale, shear)`; a reflection is
    /// folded into a negative x scale so the rotation stays proper.
    pub fn decompose(&self) -> Decomposition {
        let c0 = self.0.x_axis.truncate();
        let c1 = self.0.y_axis.truncate();

        let a = c0.length();
        if a == 0.0 {
            return Decomposition {
                rotation: [DVec2::X, DVec2::Y],
                scale: dvec2(0.0, c1.length()),
            };
        }
        let b = c0.dot(c1) / a;
        let d = (c1.length_squared() - b * b).max(0.0).sqrt();

        let mut r0 = c0 / a;
        let r1 = if d == 0.0 { r0.perp() } else { (c1 - r0 * b) / d };
        let mut zx = a;
        if r0.perp_dot(r1) < 0.0 {
            zx = -a;
            r0 = -r0;
        }
        Decomposition {
            rotation: [r0, r1],
            scale: dvec2(zx, d),
        }
    }

    /// `angle` plus the transform's rotation, in radians within `[0, 2π)`.
    pub fn rotate_angle(&self, angle: f64) -> f64 {
        let rotation = self.decompose().rotation;
        let mut theta = rotation[0].x.clamp(-1.0, 1.0).acos();
        if rotation[1].x >= 0.0 {
            theta = TAU - theta;
        }
        let mut angle = angle + theta;
        while angle >= TAU {
            angle -= TAU;
        }
        angle
    }

    /// Lengths along the local axes after scaling
    pub fn scale_length(&self, w: f64, h: f64) -> DVec2 {
        let scale = self.decompose().scale;
        dvec2(scale.x * w, scale.y * h)
    }

    /// Approximate equality for tests and invariants
    pub fn abs_diff_eq(&self, other: &Transform, max_abs_diff: f64) -> bool {
        self.0.abs_diff_eq(other.0, max_abs_diff)
    }
}

impl Mul for Transform {
    type Output = Transform;

    /// `parent * child`: child space → parent's parent space
    fn mul(self, rhs: Transform) -> Transform {
        Transform(self.0 * rhs.0)
    }
}

/// Rotation and scale parts of a transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decomposition {
    /// Columns of the orthonormal rotation matrix
    pub rotation: [DVec2; 2],
    /// Per-axis scale; `x` is negative for reflections
    pub scale: DVec2,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Size, pemu};
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_6};

    const EPS: f64 = 1e-9;

    fn size(w: f64, h: f64) -> SizeEmu {
        Size::new(Emu(w), Emu(h))
    }

    #[test]
    fn unrotated_shape_is_a_pure_translation() {
        let xfrm = Xfrm::placed(pemu(100.0, 250.0), size(400.0, 300.0));
        let t = Transform::for_shape(&xfrm, size(400.0, 300.0));

        for (x, y) in [(0.0, 0.0), (400.0, 300.0), (12.5, 280.0)] {
            let p = t.transform_point(pemu(x, y));
            assert!((p.x - (x + 100.0)).abs() < EPS);
            assert!((p.y - (y + 250.0)).abs() < EPS);
        }
    }

    #[test]
    fn child_space_is_scaled_into_the_placed_box() {
        let xfrm = Xfrm::placed(pemu(1000.0, 2000.0), size(200.0, 100.0))
            .with_child_space(pemu(50.0, 50.0), size(100.0, 100.0));
        let t = Transform::for_shape(&xfrm, size(0.0, 0.0));

        assert_eq!(t.transform_point(pemu(50.0, 50.0)), dvec2(1000.0, 2000.0));
        assert_eq!(t.transform_point(pemu(150.0, 150.0)), dvec2(1200.0, 2100.0));
    }

    #[test]
    fn zero_child_extent_keeps_unit_scale() {
        let xfrm = Xfrm::placed(pemu(10.0, 20.0), size(0.0, 0.0));
        let t = Transform::for_shape(&xfrm, size(0.0, 0.0));
        assert_eq!(t.transform_point(pemu(3.0, 4.0)), dvec2(13.0, 24.0));
    }

    #[test]
    fn rotation_and_flip_are_about_the_centre() {
        let xfrm = Xfrm::placed(pemu(0.0, 0.0), size(200.0, 100.0)).rotated(90.0);
        let t = Transform::for_shape(&xfrm, size(200.0, 100.0));
        // The centre is fixed
        assert!(t.transform_point(pemu(100.0, 50.0)).abs_diff_eq(dvec2(100.0, 50.0), EPS));
        // The top-left corner swings clockwise on screen
        assert!(t.transform_point(pemu(0.0, 0.0)).abs_diff_eq(dvec2(150.0, -50.0), EPS));

        let flipped = Xfrm::placed(pemu(0.0, 0.0), size(200.0, 100.0)).flipped(true, false);
        let t = Transform::for_shape(&flipped, size(200.0, 100.0));
        assert!(t.transform_point(pemu(0.0, 10.0)).abs_diff_eq(dvec2(200.0, 10.0), EPS));
    }

    #[test]
    fn rotate_flip_round_trip_is_identity() {
        let xfrm = Xfrm::placed(pemu(300.0, 400.0), size(200.0, 100.0))
            .rotated(90.0)
            .flipped(true, false);
        let t = Transform::for_shape(&xfrm, size(200.0, 100.0));
        assert!((t * t.inverse()).abs_diff_eq(&Transform::IDENTITY, EPS));
        assert!((t.inverse() * t).abs_diff_eq(&Transform::IDENTITY, EPS));
    }

    #[test]
    fn composition_applies_the_parent_last() {
        let group = Transform::for_shape(
            &Xfrm::placed(pemu(1000.0, 0.0), size(100.0, 100.0)),
            size(100.0, 100.0),
        );
        let child = Transform::for_shape(
            &Xfrm::placed(pemu(10.0, 10.0), size(10.0, 10.0)),
            size(10.0, 10.0),
        );
        assert_eq!((group * child).transform_point(pemu(0.0, 0.0)), dvec2(1010.0, 10.0));
    }

    #[test]
    fn decompose_recovers_rotation_and_scale() {
        let m = DMat3::from_angle(FRAC_PI_6) * DMat3::from_scale(dvec2(2.0, 3.0));
        let t = Transform::from_matrix(m);
        let parts = t.decompose();
        assert!(parts.scale.abs_diff_eq(dvec2(2.0, 3.0), EPS));
        assert!((t.rotate_angle(0.0) - FRAC_PI_6).abs() < EPS);
        assert!(t.scale_length(10.0, 10.0).abs_diff_eq(dvec2(20.0, 30.0), EPS));
    }

    #[test]
    fn negative_rotation_wraps_into_a_full_turn() {
        let t = Transform::from_matrix(DMat3::from_angle(-FRAC_PI_2));
        assert!((t.rotate_angle(0.0) - 3.0 * FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn reflection_becomes_negative_x_scale() {
        let t = Transform::from_matrix(DMat3::from_scale(dvec2(-2.0, 1.0)));
        let parts = t.decompose();
        assert!(parts.scale.abs_diff_eq(dvec2(-2.0, 1.0), EPS));
        assert!(parts.rotation[0].abs_diff_eq(DVec2::X, EPS));
    }

    #[test]
    fn root_scales_emu_to_pixels() {
        let t = Transform::root(&Scaler::default());
        assert!(t.transform_point(pemu(9525.0, 19050.0)).abs_diff_eq(dvec2(1.0, 2.0), EPS));
    }
}
