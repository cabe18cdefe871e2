//! Float formatting helpers for captions and control write-back.
//!
//! Rust's core float-to-decimal formatting has had wasm-facing panics in some
//! toolchain/browser combinations (see `dragon.rs` panics). To avoid that class
//! of issues, these helpers do **not** use `format!` on floats.
//!
//! They:
//! - Handle `NaN`/`±Infinity` explicitly, spelled the way browsers print them.
//! - For finite values, scale + round into an `i64`, then format integers.

/// Fixed-point formatting with `decimals` digits (browser `toFixed`).
#[inline]
pub fn fmt_fixed(v: f64, decimals: usize) -> String {
    fmt_fixed_inner(v, decimals)
}

/// Fixed-point formatting with trailing zeros (and a bare `.`) removed.
pub fn fmt_trimmed(v: f64, decimals: usize) -> String {
    let mut out = fmt_fixed_inner(v, decimals);
    if out.contains('.') {
        while out.ends_with('0') {
            out.pop();
        }
        if out.ends_with('.') {
            out.pop();
        }
    }
    if out == "-0" {
        out = "0".to_string();
    }
    out
}

/// Integer rounding with halves rounded up (browser `Math.round`).
pub fn fmt_round(v: f64) -> String {
    if !v.is_finite() {
        return non_finite(v);
    }
    let r = (v + 0.5).floor();
    if r.abs() > (i64::MAX as f64) {
        return non_finite(if r.is_sign_negative() {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }
    (r as i64).to_string()
}

fn non_finite(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_sign_positive() {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}

fn fmt_fixed_inner(v: f64, decimals: usize) -> String {
    if !v.is_finite() {
        return non_finite(v);
    }

    // Clamp decimals to something reasonable to avoid huge powers.
    let decimals = decimals.min(9);

    let scale_i64 = 10_i64.checked_pow(decimals as u32).unwrap_or(1_i64);
    let scale_f = scale_i64 as f64;

    let scaled = (v * scale_f).round();
    if !scaled.is_finite() || scaled.abs() > (i64::MAX as f64) {
        // Extremely large values overflow the scale.
        return non_finite(if v.is_sign_negative() {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let scaled_i = scaled as i64;
    let negative = scaled_i < 0;

    let abs_i = scaled_i.abs();
    let int_part = abs_i / scale_i64;
    let frac_part = abs_i % scale_i64;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&int_part.to_string());

    if decimals > 0 {
        out.push('.');
        let frac_str = frac_part.to_string();
        for _ in 0..decimals.saturating_sub(frac_str.len()) {
            out.push('0');
        }
        out.push_str(&frac_str);
    }

    out
}
