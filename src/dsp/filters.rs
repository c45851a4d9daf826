//! One-pole filters shared by the saturation effects

/// Coefficient of the tone filter for a `tone` knob in [0, 1]
///
/// 0 is darkest (coefficient 0.1), 1 bypasses the filter (coefficient 1.0).
#[inline]
pub fn tone_coefficient(tone: f32) -> f32 {
    0.1 + 0.9 * tone
}

/// One-pole low-pass: `y[n] = y[n-1] + coeff * (x[n] - y[n-1])`
#[derive(Debug, Clone, Default)]
pub struct OnePoleLowPass {
    state: f32,
}

impl OnePoleLowPass {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn process(&mut self, input: f32, coeff: f32) -> f32 {
        self.state += coeff * (input - self.state);
        self.state
    }

    pub fn state(&self) -> f32 {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}

/// First-order high-pass: `y[n] = a * y[n-1] + a * (x[n] - x[n-1])`
///
/// Both the previous input and the previous output carry over between
/// calls, so splitting a signal into blocks does not change the result.
#[derive(Debug, Clone)]
pub struct OnePoleHighPass {
    alpha: f32,
    prev_input: f32,
    prev_output: f32,
}

impl OnePoleHighPass {
    /// Create a high-pass with a fixed coefficient
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            prev_input: 0.0,
            prev_output: 0.0,
        }
    }

    /// Coefficient for a cutoff frequency: `1 / (1 + 2*pi*fc/fs)`
    pub fn alpha_for(cutoff_hz: f32, sample_rate: f32) -> f32 {
        1.0 / (1.0 + 2.0 * std::f32::consts::PI * cutoff_hz / sample_rate)
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.alpha * self.prev_output + self.alpha * (input - self.prev_input);
        self.prev_input = input;
        self.prev_output = output;
        output
    }

    pub fn reset(&mut self) {
        self.prev_input = 0.0;
        self.prev_output = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tone_coefficient_range() {
        assert_relative_eq!(tone_coefficient(0.0), 0.1);
        assert_relative_eq!(tone_coefficient(1.0), 1.0);
        assert_relative_eq!(tone_coefficient(0.5), 0.55);
    }

    #[test]
    fn test_lowpass_converges_to_dc() {
        let mut lp = OnePoleLowPass::new();
        let mut out = 0.0;
        for _ in 0..200 {
            out = lp.process(1.0, 0.1);
        }
        assert_relative_eq!(out, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_lowpass_full_coefficient_is_bypass() {
        let mut lp = OnePoleLowPass::new();
        assert_relative_eq!(lp.process(0.3, 1.0), 0.3, epsilon = 1e-6);
        assert_relative_eq!(lp.process(-0.7, 1.0), -0.7, epsilon = 1e-6);
    }

    #[test]
    fn test_highpass_removes_dc() {
        let mut hp = OnePoleHighPass::new(0.995);
        let mut out = 1.0;
        for _ in 0..5000 {
            out = hp.process(1.0);
        }
        assert!(out.abs() < 1e-3, "DC leaked through: {}", out);
    }

    #[test]
    fn test_highpass_block_split_is_seamless() {
        let input: Vec<f32> = (0..64).map(|i| ((i * 7) % 11) as f32 / 11.0 - 0.5).collect();

        let mut whole = OnePoleHighPass::new(0.995);
        let expected: Vec<f32> = input.iter().map(|&x| whole.process(x)).collect();

        let mut split = OnePoleHighPass::new(0.995);
        let mut actual: Vec<f32> = input[..20].iter().map(|&x| split.process(x)).collect();
        actual.extend(input[20..].iter().map(|&x| split.process(x)));

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_alpha_for_35hz() {
        let alpha = OnePoleHighPass::alpha_for(35.0, 44100.0);
        assert_relative_eq!(alpha, 0.995, epsilon = 1e-3);
    }
}
