use rand::SeedableRng;
use rand::rngs::StdRng;

/// Build the random source for one compile run.
///
/// A seed pins every effect and transition choice; `None` draws entropy from the OS.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
