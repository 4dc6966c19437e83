use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Additive smoothing applied to every cell of a probability table before normalizing
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Smoothing {
    /// Raw relative frequencies
    None,
    /// `1/m` where `m` is the number of training samples
    Original,
    /// One pseudo count per cell
    Laplace,
    /// `1/k` where `k` is the number of states of the variable
    Cestnik,
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing::Original
    }
}

impl Smoothing {
    /// Initial value of every cell of a table over a variable with `num_states` states, fitted
    /// on `n_samples` samples
    pub fn factor(&self, n_samples: usize, num_states: usize) -> f64 {
        match self {
            Smoothing::None => 0.0,
            Smoothing::Original => 1.0 / n_samples.max(1) as f64,
            Smoothing::Laplace => 1.0,
            Smoothing::Cestnik => 1.0 / num_states.max(1) as f64,
        }
    }

    /// Pseudo count used by the flat count tables of the super-parent estimators
    pub fn alpha(&self, n_samples: usize) -> f64 {
        match self {
            Smoothing::Original => 1.0 / n_samples.max(1) as f64,
            Smoothing::Laplace => 1.0,
            Smoothing::None | Smoothing::Cestnik => 0.0,
        }
    }
}

impl FromStr for Smoothing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "NONE" => Ok(Smoothing::None),
            "ORIGINAL" => Ok(Smoothing::Original),
            "LAPLACE" => Ok(Smoothing::Laplace),
            "CESTNIK" => Ok(Smoothing::Cestnik),
            other => Err(Error::InvalidArgument(format!(
                "Invalid smoothing {}, valid values [NONE, ORIGINAL, LAPLACE, CESTNIK]",
                other
            ))),
        }
    }
}

impl fmt::Display for Smoothing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Smoothing::None => "NONE",
            Smoothing::Original => "ORIGINAL",
            Smoothing::Laplace => "LAPLACE",
            Smoothing::Cestnik => "CESTNIK",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn factors() {
        assert_abs_diff_eq!(Smoothing::None.factor(10, 3), 0.0);
        assert_abs_diff_eq!(Smoothing::Original.factor(10, 3), 0.1);
        assert_abs_diff_eq!(Smoothing::Laplace.factor(10, 3), 1.0);
        assert_abs_diff_eq!(Smoothing::Cestnik.factor(10, 4), 0.25);
        assert_abs_diff_eq!(Smoothing::Cestnik.alpha(10), 0.0);
    }

    #[test]
    fn parses_names() {
        assert_eq!("LAPLACE".parse::<Smoothing>().unwrap(), Smoothing::Laplace);
        assert_eq!(Smoothing::Cestnik.to_string(), "CESTNIK");
        assert!("laplace".parse::<Smoothing>().is_err());
    }
}
