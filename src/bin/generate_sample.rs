use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use image::{GrayImage, ImageFormat, Luma};

/// Write a synthetic immunofluorescence dataset (405/488/561/brightfield TIFFs).
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Output directory (created if missing)
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data/foxa2-localized"))]
    out: PathBuf,

    /// Number of complete samples to generate
    #[arg(long, default_value_t = 6)]
    samples: usize,

    /// Image width and height in pixels
    #[arg(long, default_value_t = 128)]
    size: u32,
}

fn gaussian(dx: f64, dy: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(dx * dx + dy * dy) / (2.0 * sigma.powi(2))).exp()
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

/// A stained nucleus: centre, radius and per-channel brightness.
struct Nucleus {
    x: f64,
    y: f64,
    sigma: f64,
    dapi: f64,
    nkx2: f64,
    foxa3: f64,
}

fn render(
    size: u32,
    nuclei: &[Nucleus],
    background: f64,
    pick: impl Fn(&Nucleus) -> f64,
    rng: &mut SimpleRng,
) -> GrayImage {
    GrayImage::from_fn(size, size, |px, py| {
        let signal: f64 = nuclei
            .iter()
            .map(|n| gaussian(px as f64 - n.x, py as f64 - n.y, n.sigma, pick(n)))
            .sum();
        let value = background + signal + rng.gauss(0.0, 2.0);
        Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(42);

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;

    let size = args.size as f64;
    // one trailing sample is left incomplete (no 561 image)
    for sample in 0..=args.samples {
        let key = format!("foxa2{:05}_", sample + 1);
        let expression = 0.5 + sample as f64 / args.samples.max(1) as f64;

        let nuclei: Vec<Nucleus> = (0..12)
            .map(|_| Nucleus {
                x: rng.next_f64() * size,
                y: rng.next_f64() * size,
                sigma: 3.0 + rng.next_f64() * 3.0,
                dapi: 120.0 + rng.gauss(0.0, 20.0),
                nkx2: 60.0 * expression + rng.gauss(0.0, 10.0),
                foxa3: 90.0 * expression + rng.gauss(0.0, 10.0),
            })
            .collect();

        let mut channels = vec![
            ("405", render(args.size, &nuclei, 8.0, |n| n.dapi, &mut rng)),
            ("488", render(args.size, &nuclei, 5.0, |n| n.nkx2, &mut rng)),
            ("561", render(args.size, &nuclei, 5.0, |n| n.foxa3, &mut rng)),
            ("brightfield", render(args.size, &[], 180.0, |_| 0.0, &mut rng)),
        ];
        if sample == args.samples {
            channels.retain(|(suffix, _)| *suffix != "561");
        }

        for (suffix, image) in channels {
            let path = args.out.join(format!("{key}{suffix}.TIF"));
            image
                .save_with_format(&path, ImageFormat::Tiff)
                .with_context(|| format!("writing {}", path.display()))?;
        }
    }

    println!(
        "Wrote {} complete sample(s) and 1 incomplete sample to {}",
        args.samples,
        args.out.display()
    );
    Ok(())
}
