//! Validation helpers for DTOs.

use validator::ValidationError;

/// Highest par accepted from clients.
pub const MAX_PAR: u8 = 10;

/// Validates that a par lies in `1..=MAX_PAR`.
///
/// # Examples
///
/// ```ignore
/// validate_par(4)  // Ok
/// validate_par(0)  // Err - no hole is played in zero strokes
/// validate_par(11) // Err - above MAX_PAR
/// ```
pub fn validate_par(par: u8) -> Result<(), ValidationError> {
    if par == 0 || par > MAX_PAR {
        let mut err = ValidationError::new("par_range");
        err.message = Some(format!("Par must be between 1 and {MAX_PAR} (got {par})").into());
        return Err(err);
    }
    Ok(())
}

/// Validates a per-hole par list: empty, or one valid par per hole.
pub fn validate_hole_pars(pars: &[u8], total_holes: u8) -> Result<(), ValidationError> {
    if pars.is_empty() {
        return Ok(());
    }

    if pars.len() != usize::from(total_holes) {
        let mut err = ValidationError::new("hole_pars_length");
        err.message = Some(
            format!(
                "Expected {total_holes} hole pars (got {})",
                pars.len()
            )
            .into(),
        );
        return Err(err);
    }

    pars.iter().try_for_each(|par| validate_par(*par))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_par() {
        assert!(validate_par(3).is_ok());
        assert!(validate_par(MAX_PAR).is_ok());
        assert!(validate_par(0).is_err());
        assert!(validate_par(MAX_PAR + 1).is_err());
    }

    #[test]
    fn test_validate_hole_pars_length() {
        assert!(validate_hole_pars(&[], 18).is_ok());
        assert!(validate_hole_pars(&[4, 3, 5], 3).is_ok());
        assert!(validate_hole_pars(&[4, 3], 3).is_err()); // too short
        assert!(validate_hole_pars(&[4, 3, 5, 4], 3).is_err()); // too long
    }

    #[test]
    fn test_validate_hole_pars_values() {
        assert!(validate_hole_pars(&[4, 0, 5], 3).is_err());
        assert!(validate_hole_pars(&[4, 12, 5], 3).is_err());
    }
}
