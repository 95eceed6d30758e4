//! Writes `sample_current.csv`: a synthetic current trace with a few plateaus,
//! laid out like the instrument exports (index, time, current).

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Smooth plateau between `start` and `end` with logistic edges.
fn plateau(t: f64, start: f64, end: f64, level: f64, edge: f64) -> f64 {
    let rise = 1.0 / (1.0 + (-(t - start) / edge).exp());
    let fall = 1.0 / (1.0 + ((t - end) / edge).exp());
    level * rise * fall
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);

    // 0 → 120 s, sampled every 0.1 s
    let times: Vec<f64> = (0..1200).map(|i| i as f64 * 0.1).collect();

    // (start s, end s, level A)
    let plateaus = [(10.0, 30.0, 3.2e-6), (45.0, 70.0, 4.1e-6), (85.0, 105.0, 3.6e-6)];
    // switch-on spike at the start of the run
    let spike = (1.0, 0.4, 6.0e-6);

    let output_path = "sample_current.csv";
    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record(["No.", "Time (s)", "Current (A)"])?;

    for (i, &t) in times.iter().enumerate() {
        let signal: f64 = plateaus
            .iter()
            .map(|&(start, end, level)| plateau(t, start, end, level, 0.8))
            .sum::<f64>()
            + gaussian(t, spike.0, spike.1, spike.2);
        let current = (signal + rng.gauss(0.0, 1.5e-7)).max(0.0);
        writer.write_record(&[
            (i + 1).to_string(),
            format!("{t:.1}"),
            format!("{current:.6e}"),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {} samples to {output_path}", times.len());
    Ok(())
}
