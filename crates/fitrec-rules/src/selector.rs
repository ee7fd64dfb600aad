//! Experience-tier fallback order.

use fitrec_core::ExperienceLevel;

/// Requested tier first, then each more conservative tier down to beginner.
pub fn fallback_chain(experience: ExperienceLevel) -> Vec<ExperienceLevel> {
    let mut chain = vec![experience];
    let mut current = experience;
    while let Some(lower) = current.lower() {
        chain.push(lower);
        current = lower;
    }
    chain
}
