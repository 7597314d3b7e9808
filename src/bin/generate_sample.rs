use anyhow::{Context, Result};
use serde::Serialize;

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One row of the demo dataset: int64, object, float64 (with gaps) and bool
/// columns, plus a constant column to exercise zero-variance filters.
#[derive(Serialize)]
struct Record {
    id: i64,
    region: &'static str,
    product: &'static str,
    price: f64,
    discount: Option<f64>,
    quantity: i64,
    in_stock: bool,
    tax_rate: f64,
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let regions = ["North", "South", "East", "West"];
    let products = ["Widget", "Gadget", "Gizmo", "Doohickey", "Thingamajig"];
    let base_prices = [9.99, 24.5, 3.75, 120.0, 58.25];

    let output_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    let n_rows = 250;
    for id in 1..=n_rows {
        let product_idx = (rng.next_u64() % products.len() as u64) as usize;
        let price = (base_prices[product_idx] * rng.gauss(1.0, 0.08)).max(0.5);
        // Roughly one row in six has no discount recorded.
        let discount = (rng.next_f64() > 0.17).then(|| (rng.next_f64() * 30.0).round() / 100.0);

        let record = Record {
            id,
            region: rng.pick(&regions),
            product: products[product_idx],
            price: (price * 100.0).round() / 100.0,
            discount,
            quantity: 1 + (rng.next_u64() % 40) as i64,
            in_stock: rng.next_f64() > 0.2,
            tax_rate: 0.2,
        };
        writer.serialize(&record).context("writing record")?;
    }
    writer.flush().context("flushing CSV writer")?;

    println!("Wrote {n_rows} rows to {output_path}");
    Ok(())
}
