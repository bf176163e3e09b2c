// THEORY:
// The concentration estimate turns a mean gray level into a coarse reading of the
// analyte concentration. It is calibration data, not a model: the bands below were
// measured on reference samples and must not be interpolated.
//
// The table is ordered by descending lower bound and evaluated first-match, so each
// lower bound is inclusive (151 reads as 10, not 0). Anything below the last band is
// darker than every calibrated reference and is reported as undeterminable, which in
// practice usually means the photo shows the sample itself.

pub mod concentration {
    use std::fmt;

    /// Mean gray levels at or above `.0` read as concentration `.1`.
    pub const CONCENTRATION_BANDS: [(i64, u8); 5] = [(153, 0), (151, 10), (142, 30), (128, 60), (120, 90)];

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ConcentrationEstimate {
        /// A calibrated concentration level.
        Level(u8),
        /// Below the darkest calibrated band.
        Undeterminable,
    }

    impl fmt::Display for ConcentrationEstimate {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                ConcentrationEstimate::Level(level) => write!(f, "concentration ≈ {}", level),
                ConcentrationEstimate::Undeterminable => {
                    f.write_str("undeterminable (reading is likely the sample itself)")
                }
            }
        }
    }

    pub fn estimate_concentration(total: i64) -> ConcentrationEstimate {
        CONCENTRATION_BANDS
            .iter()
            .find(|(lower_bound, _)| total >= *lower_bound)
            .map_or(ConcentrationEstimate::Undeterminable, |&(_, level)| {
                ConcentrationEstimate::Level(level)
            })
    }
}
