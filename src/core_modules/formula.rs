// THEORY (color-to-gray formulas):
// Each `GrayscaleFormula` is a pure function from one `Pixel` to one gray level.
// They are all single-pixel heuristics: none of them looks at neighbors, so the
// image-level transform is an embarrassingly parallel map over the pixel grid.
//
// Fidelity rules:
// - The weighted formulas round (601) or floor (709) every weighted channel on its
//   own and only then add the terms. Rounding the aggregate would differ by ±1 on
//   mid-range inputs, and the calibration table in `concentration` was measured
//   against the per-term output.
// - Rounding is half-to-even, so R·0.3 = 76.5 rounds to 76 and white maps to 254.
// - Sums are formed in `u32` and saturated at 255. With 8-bit inputs the saturation
//   never triggers.
// - Achromatic input (R = G = B = v) maps to v for every formula except the two
//   weighted ones, where the per-term rounding leaves it within 2 levels of v.

pub mod formula {
    use crate::core_modules::pixel::pixel::{GrayLevel, Pixel};
    use crate::error::AssayError;
    use std::fmt;
    use std::str::FromStr;

    const REC601_WEIGHTS: (f64, f64, f64) = (0.3, 0.59, 0.11);
    const REC709_WEIGHTS: (f64, f64, f64) = (0.2126, 0.7152, 0.0722);

    /// The catalogue of color-to-gray mappings.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub enum GrayscaleFormula {
        /// ⌊(R + G + B) / 3⌋
        Averaging,
        /// round(0.3·R) + round(0.59·G) + round(0.11·B)
        ///
        /// Ties round half-to-even, not half-up: G = 150 gives an 88 term where half-up gives 89.
        #[default]
        LuminanceWeighted601,
        /// ⌊0.2126·R⌋ + ⌊0.7152·G⌋ + ⌊0.0722·B⌋
        LuminanceWeighted709,
        /// ⌊(max + min) / 2⌋
        Desaturation,
        DecompositionMax,
        DecompositionMin,
        SingleChannelRed,
        SingleChannelGreen,
        SingleChannelBlue,
    }

    impl GrayscaleFormula {
        pub const ALL: [GrayscaleFormula; 9] = [
            GrayscaleFormula::Averaging,
            GrayscaleFormula::LuminanceWeighted601,
            GrayscaleFormula::LuminanceWeighted709,
            GrayscaleFormula::Desaturation,
            GrayscaleFormula::DecompositionMax,
            GrayscaleFormula::DecompositionMin,
            GrayscaleFormula::SingleChannelRed,
            GrayscaleFormula::SingleChannelGreen,
            GrayscaleFormula::SingleChannelBlue,
        ];

        pub fn name(self) -> &'static str {
            match self {
                GrayscaleFormula::Averaging => "averaging",
                GrayscaleFormula::LuminanceWeighted601 => "luminance-601",
                GrayscaleFormula::LuminanceWeighted709 => "luminance-709",
                GrayscaleFormula::Desaturation => "desaturation",
                GrayscaleFormula::DecompositionMax => "decomposition-max",
                GrayscaleFormula::DecompositionMin => "decomposition-min",
                GrayscaleFormula::SingleChannelRed => "single-channel-red",
                GrayscaleFormula::SingleChannelGreen => "single-channel-green",
                GrayscaleFormula::SingleChannelBlue => "single-channel-blue",
            }
        }

        /// Maps one pixel to its gray level. Alpha never participates.
        pub fn gray_level(self, pixel: &Pixel) -> GrayLevel {
            let (r, g, b) = (pixel.red as u32, pixel.green as u32, pixel.blue as u32);
            let level = match self {
                GrayscaleFormula::Averaging => (r + g + b) / 3,
                GrayscaleFormula::LuminanceWeighted601 => {
                    let (wr, wg, wb) = REC601_WEIGHTS;
                    rounded_term(r, wr) + rounded_term(g, wg) + rounded_term(b, wb)
                }
                GrayscaleFormula::LuminanceWeighted709 => {
                    let (wr, wg, wb) = REC709_WEIGHTS;
                    floored_term(r, wr) + floored_term(g, wg) + floored_term(b, wb)
                }
                GrayscaleFormula::Desaturation => {
                    (pixel.max_channel() as u32 + pixel.min_channel() as u32) / 2
                }
                GrayscaleFormula::DecompositionMax => pixel.max_channel() as u32,
                GrayscaleFormula::DecompositionMin => pixel.min_channel() as u32,
                GrayscaleFormula::SingleChannelRed => r,
                GrayscaleFormula::SingleChannelGreen => g,
                GrayscaleFormula::SingleChannelBlue => b,
            };
            level.min(GrayLevel::MAX as u32) as GrayLevel
        }

        /// The pixel with R, G and B replaced by `gray_level`.
        pub fn apply(self, pixel: Pixel) -> Pixel {
            pixel.with_gray(self.gray_level(&pixel))
        }
    }

    #[inline]
    fn rounded_term(channel: u32, weight: f64) -> u32 {
        (channel as f64 * weight).round_ties_even() as u32
    }

    #[inline]
    fn floored_term(channel: u32, weight: f64) -> u32 {
        (channel as f64 * weight).floor() as u32
    }

    impl fmt::Display for GrayscaleFormula {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.name())
        }
    }

    impl FromStr for GrayscaleFormula {
        type Err = AssayError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let wanted = s.trim().to_ascii_lowercase();
            GrayscaleFormula::ALL
                .into_iter()
                .find(|formula| formula.name() == wanted)
                .ok_or_else(|| AssayError::UnknownFormula(s.to_string()))
        }
    }
}
