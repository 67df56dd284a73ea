//! Write a synthetic CHI760e-layout `.bin` file with a known reversible
//! couple, for demos and by-hand verification of the decoder and the E1/2
//! pipeline.

use byteorder::{LittleEndian, WriteBytesExt};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
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

fn push_text(buf: &mut Vec<u8>, text: &str, len: usize) {
    let mut field = text.as_bytes().to_vec();
    field.resize(len, 0);
    buf.extend_from_slice(&field);
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // Sweep window: -0.1 V → 0.6 V and back, twice (4 segments).
    let low_e = -0.1f64;
    let high_e = 0.6f64;
    let interval = 0.002f64;
    let steps = ((high_e - low_e) / interval).round() as usize;

    // Reversible couple: anodic wave at 0.29 V, cathodic return at 0.21 V,
    // so the decoded E1/2 lands at 0.25 V.
    let e_pa = 0.29;
    let e_pc = 0.21;
    let amplitude = 2.0e-5;
    let capacitive = 1.5e-6;
    // Kept under the peak engine's default prominence margin so the decoded
    // file reports exactly one couple.
    let noise = 1.0e-10;

    let mut buf: Vec<u8> = Vec::new();
    buf.extend_from_slice(b"CHI760E");
    buf.push(1);
    push_text(&mut buf, "CHI760e", 16);
    push_text(&mut buf, "CV", 16);
    push_text(&mut buf, "synthetic ferrocene couple", 64);

    let header_fields = [
        low_e as f32,       // init_e
        low_e as f32,       // final_e
        high_e as f32,      // high_e
        low_e as f32,       // low_e
        0.1,                // scan_rate (V/s)
        interval as f32,    // sample_interval (V)
        2.0,                // quiet_time (s)
        1.0e-5,             // sensitivity (A/V)
    ];
    for value in header_fields {
        buf.write_f32::<LittleEndian>(value).unwrap();
    }

    let num_segments = 4i32;
    buf.write_i32::<LittleEndian>(num_segments).unwrap();

    let mut total_samples = 0usize;
    for segment in 0..num_segments {
        let forward = segment % 2 == 0;
        buf.write_i32::<LittleEndian>(steps as i32 + 1).unwrap();
        buf.push(forward as u8);

        for i in 0..=steps {
            let potential = if forward {
                low_e + i as f64 * interval
            } else {
                high_e - i as f64 * interval
            };
            let faradaic = if forward {
                gaussian(potential, e_pa, 0.03, amplitude)
            } else {
                gaussian(potential, e_pc, 0.03, -amplitude)
            };
            let baseline = if forward { capacitive } else { -capacitive };
            let current = faradaic + baseline + rng.gauss(0.0, noise);

            buf.write_f32::<LittleEndian>(potential as f32).unwrap();
            buf.write_f32::<LittleEndian>(current as f32).unwrap();
            total_samples += 1;
        }
    }

    let output_path = "sample_cv.bin";
    std::fs::write(output_path, &buf).expect("Failed to write output file");

    println!(
        "Wrote {num_segments} segments ({total_samples} samples, {} bytes) to {output_path}",
        buf.len()
    );
    println!("Expected E1/2 ≈ {:.3} V", 0.5 * (e_pa + e_pc));
}
