use nalgebra::Vector3;

use super::{planet_ids::Planet, se1_header::PlanetRecord};
use crate::constants::{CEPS2000, DPI, SEPS2000};

/// Rotate freshly decoded segment coefficients from the body's mean orbital
/// plane back to J2000 equatorial axes.
///
/// The rotation is a basis change applied coefficient-wise: because the
/// transform is linear, rotating each Chebyshev coefficient triple is exact
/// and leaves the cached segment ready for evaluation in the target frame.
///
/// Arguments
/// ---------
/// * `rec`: the body record carrying the rotation constants.
/// * `tseg0`: start of the decoded segment, Julian day.
/// * `segp`: `3 * ncoe` coefficients, x block, y block, z block; rewritten
///   in place.
///
/// Method
/// ------
/// The plane orientation angles are evaluated at the segment midpoint. For
/// the Moon the stored pair is (node angle, inclination-like amplitude) and
/// the (q, p) pair is reconstructed through `cos`/`sin` of the node; for
/// the planets the stored pair is (q, p) directly. If the body carries a
/// reference ellipse, its Chebyshev representation is rotated by the mean
/// perihelion longitude and added first.
///
/// The orbit pole is `(2p, −2q, 1 − q² − p²) / (1 + q² + p²)`; the in-plane
/// second axis is the normalized node direction `(−ûz_y, ûz_x, 0)`, and the
/// first axis completes the right-handed triad by cross product. Bodies
/// flagged for rotation always carry a non-degenerate plane orientation.
/// Each coefficient triple projects onto the triad by dot products, then
/// the fixed rotation by the producer's frozen J2000 obliquity constants
/// yields the final equatorial representation.
pub(crate) fn rot_back(rec: &PlanetRecord, tseg0: f64, segp: &mut [f64]) {
    let ncoe = rec.ncoe;
    let t = tseg0 + rec.dseg / 2.0;
    let tdiff = (t - rec.telem) / 365250.0;

    let (qav, pav) = if rec.ibdy == Planet::Moon.id() {
        let dn = (rec.prot + tdiff * rec.dprot) % DPI;
        let incl = rec.qrot + tdiff * rec.dqrot;
        (incl * dn.cos(), incl * dn.sin())
    } else {
        (rec.qrot + tdiff * rec.dqrot, rec.prot + tdiff * rec.dprot)
    };

    let mut coef: Vec<Vector3<f64>> = (0..ncoe)
        .map(|i| Vector3::new(segp[i], segp[i + ncoe], segp[i + 2 * ncoe]))
        .collect();

    // add the reference orbit
    if let Some(refep) = rec.refep.as_deref() {
        let omtild = (rec.peri + tdiff * rec.dperi) % DPI;
        let (som, com) = omtild.sin_cos();
        for (i, c) in coef.iter_mut().enumerate() {
            c.x = segp[i] + com * refep[i] - som * refep[i + ncoe];
            c.y = segp[i + ncoe] + com * refep[i + ncoe] + som * refep[i];
        }
    }

    // orbit pole, node direction in the reference plane, completing axis
    let h = 1.0 / (1.0 + qav * qav + pav * pav);
    let uiz = Vector3::new(
        2.0 * pav * h,
        -2.0 * qav * h,
        (1.0 - qav * qav - pav * pav) * h,
    );
    let uiy = Vector3::new(-uiz.y, uiz.x, 0.0);
    let uz = uiz.normalize();
    let uy = uiy.normalize();
    let ux = uy.cross(&uz);

    for (i, c) in coef.iter().enumerate() {
        let xrot = ux.dot(c);
        let yrot = uy.dot(c);
        let zrot = uz.dot(c);

        segp[i] = xrot;
        segp[i + ncoe] = CEPS2000 * yrot + SEPS2000 * zrot;
        segp[i + 2 * ncoe] = -SEPS2000 * yrot + CEPS2000 * zrot;
    }
}
