use std::fmt::Write as _;

use anyhow::{Context, Result};

/// Null sentinel written for logging gaps.
const NULL: f64 = -999.25;

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

/// Lithology layers: (top depth, name, GR, RHOB, NPHI).
const LAYERS: [(f64, &str, f64, f64, f64); 5] = [
    (1000.0, "shale", 110.0, 2.45, 0.33),
    (1060.0, "sand", 45.0, 2.25, 0.22),
    (1110.0, "shale", 105.0, 2.50, 0.30),
    (1150.0, "limestone", 25.0, 2.65, 0.08),
    (1200.0, "sand", 50.0, 2.30, 0.24),
];

struct Sample {
    depth: f64,
    zone: &'static str,
    gr: f64,
    rhob: f64,
    nphi: f64,
}

fn layer_at(depth: f64) -> (&'static str, f64, f64, f64) {
    let (_, name, gr, rhob, nphi) = LAYERS
        .iter()
        .rev()
        .find(|l| depth >= l.0)
        .copied()
        .unwrap_or(LAYERS[0]);
    (name, gr, rhob, nphi)
}

fn generate(rng: &mut SimpleRng) -> Vec<Sample> {
    // 1000 → 1250 ft, step 0.5
    (0..=500)
        .map(|i| {
            let depth = 1000.0 + i as f64 * 0.5;
            let (zone, gr, rhob, nphi) = layer_at(depth);
            Sample {
                depth,
                zone,
                gr: rng.gauss(gr, 6.0),
                rhob: rng.gauss(rhob, 0.02),
                nphi: rng.gauss(nphi, 0.01).max(0.0),
            }
        })
        .collect()
}

fn write_las(samples: &[Sample]) -> String {
    let start = samples.first().map(|s| s.depth).unwrap_or(0.0);
    let stop = samples.last().map(|s| s.depth).unwrap_or(0.0);

    let mut out = String::new();
    let _ = write!(
        out,
        "\
~VERSION INFORMATION
 VERS.                  2.0 : CWLS LOG ASCII STANDARD - VERSION 2.0
 WRAP.                   NO : ONE LINE PER DEPTH STEP
~WELL INFORMATION
#MNEM.UNIT       DATA            DESCRIPTION
 STRT.FT     {start:>10.4} : START DEPTH
 STOP.FT     {stop:>10.4} : STOP DEPTH
 STEP.FT         0.5000 : STEP
 NULL.         {NULL} : NULL VALUE
 WELL.      SYNTHETIC-1 : WELL
 FLD .        WILDCAT : FIELD
~CURVE INFORMATION
 DEPT.FT                : DEPTH
 GR  .GAPI              : GAMMA RAY
 RHOB.G/C3              : BULK DENSITY
 NPHI.V/V               : NEUTRON POROSITY
~PARAMETER INFORMATION
 BHT .DEGF        165.0 : BOTTOM HOLE TEMPERATURE
~OTHER
 Synthetic log written by generate_sample.
~A  DEPT        GR      RHOB      NPHI
"
    );
    for (i, s) in samples.iter().enumerate() {
        // A short tool gap to exercise null handling.
        let gr = if (120..124).contains(&i) { NULL } else { s.gr };
        let _ = writeln!(
            out,
            "{:>9.2} {:>9.3} {:>9.4} {:>9.4}",
            s.depth, gr, s.rhob, s.nphi
        );
    }
    out
}

fn write_csv(samples: &[Sample]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["DEPTH", "GR", "RHOB", "NPHI", "ZONE"])?;
    for s in samples {
        writer.write_record([
            format!("{:.2}", s.depth),
            format!("{:.3}", s.gr),
            format!("{:.4}", s.rhob),
            format!("{:.4}", s.nphi),
            s.zone.to_string(),
        ])?;
    }
    Ok(writer.into_inner().map_err(|e| e.into_error())?)
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let samples = generate(&mut rng);

    std::fs::write("sample_well.las", write_las(&samples)).context("writing sample_well.las")?;
    std::fs::write("sample_well.csv", write_csv(&samples)?).context("writing sample_well.csv")?;

    println!(
        "Wrote {} depth samples to sample_well.las and sample_well.csv",
        samples.len()
    );
    Ok(())
}
