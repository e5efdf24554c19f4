mod hub;
mod sim_time;
mod simulator;

use rand::SeedableRng;
use rand_pcg::Pcg64;

pub(crate) fn seeded(seed: u64) -> Pcg64 {
    Pcg64::seed_from_u64(seed)
}
