use std::fs;
use std::path::Path;

/// Number of iterations each synthetic run logs.
const ITERATIONS: usize = 150;

/// Tiny deterministic PRNG (splitmix64), enough for log-file noise.
struct Rng {
    state: u64,
}

impl Rng {
    fn new(seed: u64) -> Self {
        // Pre-advance once so small seeds do not start near zero.
        let mut rng = Rng { state: seed };
        rng.next_u64();
        rng
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn uniform(&mut self) -> f64 {
        self.next_u64() as f64 / u64::MAX as f64
    }

    /// Zero-mean gaussian noise via the central-limit trick: the sum of
    /// twelve uniforms has variance 1 once re-centred around 6.
    fn noise(&mut self, std_dev: f64) -> f64 {
        let sum: f64 = (0..12).map(|_| self.uniform()).sum();
        std_dev * (sum - 6.0)
    }
}

/// Exponential decay from `start` towards `floor` with gaussian noise.
fn decay(start: f64, floor: f64, rate: f64, i: usize, noise: f64, rng: &mut Rng) -> f64 {
    floor + (start - floor) * (-rate * i as f64).exp() + rng.noise(noise)
}

/// Saturating rise from 0 towards `ceiling` with gaussian noise.
fn rise(ceiling: f64, rate: f64, i: usize, noise: f64, rng: &mut Rng) -> f64 {
    ceiling * (1.0 - (-rate * i as f64).exp()) + rng.noise(noise)
}

fn write_lines(dir: &Path, name: &str, header: Option<&str>, lines: Vec<String>) {
    let path = dir.join(name);
    let mut out = String::new();
    if let Some(h) = header {
        out.push_str(h);
        out.push('\n');
    }
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
    fs::write(&path, out).expect("Failed to write log file");
}

/// Single-column metric file, optionally with a header label.
fn write_metric(
    dir: &Path,
    name: &str,
    header: Option<&str>,
    mut f: impl FnMut(usize) -> f64,
) {
    let lines = (0..ITERATIONS).map(|i| format!("{:.6}", f(i))).collect();
    write_lines(dir, name, header, lines);
}

fn generate_run(root: &Path, name: &str, seed: u64, lr: f64, with_autostep: bool) {
    let dir = root.join(name);
    fs::create_dir_all(dir.join("scores0")).expect("Failed to create run directory");
    let mut rng = Rng::new(seed);

    // Objective-like metrics: large at the start, converging to a floor.
    let obj_rate = 0.03 + lr * 0.1;
    write_metric(&dir, "obj", Some("obj"), |i| {
        decay(1800.0, 40.0, obj_rate, i, 4.0, &mut rng)
    });
    let mut rng = Rng::new(seed ^ 0x10);
    write_metric(&dir, "loss", Some("loss"), |i| {
        decay(3.2, 0.15, obj_rate, i, 0.02, &mut rng)
    });
    let mut rng = Rng::new(seed ^ 0x20);
    write_metric(&dir, "dscore", None, |i| {
        decay(0.9, 0.05, obj_rate, i, 0.01, &mut rng)
    });
    let mut rng = Rng::new(seed ^ 0x21);
    write_metric(&dir, "a_dscore", None, |i| {
        decay(0.8, 0.04, obj_rate, i, 0.01, &mut rng)
    });
    let mut rng = Rng::new(seed ^ 0x22);
    write_metric(&dir, "d_slack", None, |i| {
        decay(0.5, 0.01, obj_rate, i, 0.005, &mut rng)
    });

    // Rates and norms.
    write_metric(&dir, "learning_rate", None, |i| {
        lr * 0.5f64.powi((i / 50) as i32)
    });
    let mut rng = Rng::new(seed ^ 0x30);
    write_metric(&dir, "norm_w", None, |i| {
        rise(12.0, 0.02, i, 0.05, &mut rng)
    });
    let mut rng = Rng::new(seed ^ 0x31);
    write_metric(&dir, "norm_dfy", None, |i| {
        decay(5.0, 0.3, 0.02, i, 0.05, &mut rng)
    });
    write_metric(&dir, "m", None, |i| (i / 10 + 1) as f64);

    // Two columns: total and active cardinality.
    let mut rng = Rng::new(seed ^ 0x40);
    let lines = (0..ITERATIONS)
        .map(|i| {
            let total = rise(400.0, 0.04, i, 2.0, &mut rng).max(0.0).round();
            let active = (total * 0.6).round();
            format!("{total} {active}")
        })
        .collect();
    write_lines(&dir, "constraint_set_card", None, lines);

    if with_autostep {
        let mut rng = Rng::new(seed ^ 0x50);
        write_metric(&dir, "autostep_learning_rate", None, |i| {
            decay(lr, lr * 0.1, 0.01, i, lr * 0.005, &mut rng)
        });
        // Step index in column 0, value in column 1.
        for (k, file) in [
            "autostep_learning_rate_all_0",
            "autostep_learning_rate_all_1",
            "autostep_learning_rate_all_2",
            "autostep_linear_min",
            "autostep_quadratic_min",
        ]
        .into_iter()
        .enumerate()
        {
            let mut rng = Rng::new(seed ^ (0x60 + k as u64));
            let lines = (0..ITERATIONS)
                .map(|i| {
                    let v = decay(lr * (k as f64 + 1.0), lr * 0.05, 0.015, i, lr * 0.01, &mut rng);
                    format!("{i} {v:.8}")
                })
                .collect();
            write_lines(&dir, file, None, lines);
        }
    }

    // Score tables: 10 columns, overall score last.
    for (file, ceiling) in [("scores0/training_score", 0.95_f64), ("scores0/test_score", 0.88_f64)] {
        let mut rng = Rng::new(seed ^ 0x70 ^ ceiling.to_bits());
        let lines = (0..ITERATIONS)
            .map(|i| {
                let score: f64 = rise(ceiling, 0.05, i, 0.004, &mut rng).clamp(0.0, 1.0);
                let tp = (score * 1000.0).round();
                let fp = ((1.0 - score) * 400.0).round();
                let fn_ = ((1.0 - score) * 600.0).round();
                let tn = 8000.0 - fp;
                let precision = tp / (tp + fp).max(1.0);
                let recall = tp / (tp + fn_).max(1.0);
                let f1 = 2.0 * precision * recall / (precision + recall).max(1e-9);
                format!(
                    "{i} {tp} {fp} {fn_} {tn} {precision:.4} {recall:.4} {f1:.4} {:.4} {score:.4}",
                    (tp + tn) / 10000.0
                )
            })
            .collect();
        write_lines(
            &dir,
            file,
            Some("iter tp fp fn tn precision recall f1 accuracy score"),
            lines,
        );
    }
}

fn main() {
    let root = std::env::args()
        .nth(1)
        .unwrap_or_else(|| ".".to_string());
    let root = Path::new(&root);

    generate_run(root, "training_files_lr0.1", 42, 0.1, false);
    generate_run(root, "training_files_lr0.01", 43, 0.01, false);
    generate_run(root, "training_files_autostep", 44, 0.05, true);

    println!(
        "Wrote 3 runs of {ITERATIONS} iterations under {}",
        root.display()
    );
}
