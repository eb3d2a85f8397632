use ndarray::Array1;

/// Round `v` to the nearest multiple of `step`.
///
/// Both neighbours `floor(v/step)*step` and `ceil(v/step)*step` are computed;
/// the ceiling wins only when strictly closer, so ties go to the floor.
/// A zero step disables quantization.
pub fn quantize(v: f64, step: f64) -> f64 {
    if step == 0.0 {
        return v;
    }
    let lo = (v / step).floor() * step;
    let hi = (v / step).ceil() * step;
    if (hi - v) < (v - lo) { hi } else { lo }
}

pub(crate) fn apply_precision(x: &mut Array1<f64>, step: f64) {
    if step == 0.0 {
        return;
    }
    x.mapv_inplace(|v| quantize(v, step));
}
