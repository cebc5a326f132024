//! Vessel display names.

use rand::seq::SliceRandom;
use rand::Rng;

/// Base names drawn from when naming a vessel.
pub const NAME_POOL: [&str; 18] = [
    "Sea Eagle",
    "Adriatic Queen",
    "Dalmatian Dream",
    "Wave Runner",
    "Island Hopper",
    "Blue Fin",
    "Sun Seeker",
    "Coastal Voyager",
    "Neptune's Kiss",
    "Poseidon's Pride",
    "Channel Spirit",
    "Northern Light",
    "Southern Cross",
    "Mid-Sea Drifter",
    "Buffer Skimmer",
    "Zone Tester",
    "Caribbean Breeze",
    "Grenadine Ghost",
];

/// Random pool name plus a three-digit suffix, e.g. `"Blue Fin 417"`.
pub fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let base = NAME_POOL.choose(rng).copied().unwrap_or("Vessel");
    let suffix: u16 = rng.gen_range(100..=999);
    format!("{} {}", base, suffix)
}
