// Fit module - ordinary least-squares line fit

/// `y = intercept + slope * x`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub intercept: f64,
    pub slope: f64,
}

/// Least-squares line through `(x[i], y[i])`
///
/// Returns `None` for fewer than two points, mismatched lengths, zero
/// variance in `x`, or a non-finite result.
pub fn linear_fit(x: &[f64], y: &[f64]) -> Option<LineFit> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (sxx, sxy) = x
        .iter()
        .zip(y)
        .fold((0.0, 0.0), |(sxx, sxy), (&xi, &yi)| {
            let dx = xi - mean_x;
            (sxx + dx * dx, sxy + dx * (yi - mean_y))
        });

    if sxx <= 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    (slope.is_finite() && intercept.is_finite()).then_some(LineFit { intercept, slope })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 5.0, 7.0];
        let fit = linear_fit(&x, &y).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(linear_fit(&[1.0], &[2.0]).is_none());
        assert!(linear_fit(&[1.0, 1.0], &[2.0, 3.0]).is_none());
        assert!(linear_fit(&[1.0, 2.0], &[2.0]).is_none());
        assert!(linear_fit(&[1.0, 2.0], &[f64::INFINITY, 3.0]).is_none());
    }
}
