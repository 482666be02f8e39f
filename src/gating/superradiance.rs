// Superradiance module - Kerr-Newman linear-response gate
//
// Geometric units (G = c = 1). A massive test field of mass mu is gated
// open when it is both quasibound and superradiant:
//   mu > mu0 = q Q / M
//   mu < omega_c = (m a + q Q r+) / (r+^2 + a^2)
// With Q = 0 these reduce to 0 < mu < Omega_H.

use serde::{Deserialize, Serialize};

use super::GateOutcome;
use crate::error::GateError;

/// Black-hole remnant and test-field parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BhParams {
    /// Remnant mass M
    pub mass: f64,
    /// Specific angular momentum a = J / M
    pub spin: f64,
    /// Black-hole charge Q (astrophysically ~0)
    pub charge: f64,
    /// Azimuthal number m of the mode
    pub azimuthal_m: i32,
    /// Test-field charge q
    pub field_charge: f64,
    /// Test-field mass mu (Compton frequency)
    pub field_mass: f64,
}

impl BhParams {
    /// Uncharged Kerr hole with a neutral m = 1 test field
    pub fn kerr(mass: f64, spin: f64, field_mass: f64) -> Self {
        Self {
            mass,
            spin,
            charge: 0.0,
            azimuthal_m: 1,
            field_charge: 0.0,
            field_mass,
        }
    }

    /// Outer horizon radius `r+ = M + sqrt(M^2 - a^2 - Q^2)`
    pub fn r_plus(&self) -> Result<f64, GateError> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(GateError::InvalidParameter {
                name: "mass".to_string(),
                reason: format!("must be positive and finite, got {}", self.mass),
            });
        }

        let disc = self.mass * self.mass - self.spin * self.spin - self.charge * self.charge;
        if disc < 0.0 {
            return Err(GateError::ExtremalityViolated {
                mass: self.mass,
                spin: self.spin,
                charge: self.charge,
            });
        }
        Ok(self.mass + disc.sqrt())
    }

    /// Quasibound threshold `mu0 = q Q / M`
    ///
    /// Only meaningful for a positive mass, which every gate query checks
    /// through [`BhParams::r_plus`] first.
    pub fn mu0(&self) -> f64 {
        self.field_charge * self.charge / self.mass
    }

    /// Superradiant critical frequency
    pub fn omega_c(&self) -> Result<f64, GateError> {
        let rp = self.r_plus()?;
        let num = self.azimuthal_m as f64 * self.spin + self.field_charge * self.charge * rp;
        let den = rp * rp + self.spin * self.spin;
        Ok(num / den)
    }

    /// True iff `mu0 < mu < omega_c`
    pub fn superradiance_overlap(&self) -> Result<bool, GateError> {
        let omega_c = self.omega_c()?;
        Ok(self.field_mass > self.mu0() && self.field_mass < omega_c)
    }

    /// Quadratic onset proxy `C (mu - mu0)^2` inside the overlap, else 0
    ///
    /// A relative weight, not a calibrated growth rate.
    pub fn growth_weight(&self, scale: f64) -> Result<f64, GateError> {
        if self.superradiance_overlap()? {
            let d = self.field_mass - self.mu0();
            Ok(scale * d * d)
        } else {
            Ok(0.0)
        }
    }

    /// Gate, weight and both thresholds
    pub fn evaluate(&self, scale: f64) -> Result<GateOutcome, GateError> {
        Ok(GateOutcome {
            gate: self.superradiance_overlap()?,
            weight: self.growth_weight(scale)?,
            omega_c: self.omega_c()?,
            mu0: self.mu0(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_spin_overlap() {
        let params = BhParams::kerr(1.0, 0.9, 0.05);
        let omega_c = params.omega_c().unwrap();

        // r+ = 1 + sqrt(0.19), Omega_H = a / (r+^2 + a^2)
        let rp = 1.0 + 0.19f64.sqrt();
        assert!((params.r_plus().unwrap() - rp).abs() < 1e-12);
        assert!((omega_c - 0.9 / (rp * rp + 0.81)).abs() < 1e-12);
        assert!(omega_c > params.field_mass);
        assert_eq!(params.mu0(), 0.0);
        assert!(params.superradiance_overlap().unwrap());
        assert!((params.growth_weight(1.0).unwrap() - 0.0025).abs() < 1e-12);
    }

    #[test]
    fn test_heavy_field_closes_gate() {
        let params = BhParams::kerr(1.0, 0.9, 0.5);
        assert!(!params.superradiance_overlap().unwrap());
        assert_eq!(params.growth_weight(1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_schwarzschild_never_superradiant() {
        let params = BhParams::kerr(1.0, 0.0, 0.01);
        assert_eq!(params.omega_c().unwrap(), 0.0);
        assert!(!params.superradiance_overlap().unwrap());
    }

    #[test]
    fn test_charged_thresholds() {
        let params = BhParams {
            mass: 2.0,
            spin: 0.5,
            charge: 0.4,
            azimuthal_m: 1,
            field_charge: 1.0,
            field_mass: 0.3,
        };
        assert!((params.mu0() - 0.2).abs() < 1e-12);
        let outcome = params.evaluate(2.0).unwrap();
        assert_eq!(outcome.gate, params.superradiance_overlap().unwrap());
        assert_eq!(outcome.weight, params.growth_weight(2.0).unwrap());
    }

    #[test]
    fn test_extremality_violation() {
        let params = BhParams::kerr(1.0, 1.2, 0.05);
        assert!(matches!(
            params.r_plus(),
            Err(GateError::ExtremalityViolated { .. })
        ));
        assert!(params.evaluate(1.0).is_err());
    }

    #[test]
    fn test_non_positive_mass_rejected() {
        let params = BhParams::kerr(0.0, 0.0, 0.05);
        assert!(matches!(
            params.omega_c(),
            Err(GateError::InvalidParameter { .. })
        ));
        assert!(params.superradiance_overlap().is_err());
        assert!(matches!(
            params.evaluate(1.0),
            Err(GateError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_evaluate_matches_thresholds() {
        let open = BhParams::kerr(1.0, 0.9, 0.05);
        let closed = BhParams::kerr(1.0, 0.9, 0.5);
        let charged = BhParams {
            mass: 2.0,
            spin: 0.5,
            charge: 0.4,
            azimuthal_m: 2,
            field_charge: 1.0,
            field_mass: 0.3,
        };

        for params in [open, closed, charged] {
            let outcome = params.evaluate(3.0).unwrap();
            assert_eq!(outcome.omega_c, params.omega_c().unwrap());
            assert_eq!(outcome.mu0, params.mu0());
            assert_eq!(
                outcome.gate,
                params.field_mass > outcome.mu0 && params.field_mass < outcome.omega_c
            );
            assert_eq!(outcome.weight, params.growth_weight(3.0).unwrap());
        }
        assert!(open.evaluate(1.0).unwrap().gate);
        assert!(!closed.evaluate(1.0).unwrap().gate);
        assert_eq!(closed.evaluate(1.0).unwrap().weight, 0.0);
    }
}
