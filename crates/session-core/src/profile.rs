//! Deterministic participant roster generation. Attributes are sampled per
//! seed stream with light correlations: age caps the education tier,
//! postgraduate degrees narrow the occupation pool, and a final pass
//! guarantees all three political wings are represented.

use contracts::{
    EducationLevel, Occupation, ParticipantProfile, PoliticalStance, SocioeconomicStatus,
    StanceWing,
};

use crate::sampling::{mix_seed, sample_index, sample_range_i64};

const FIRST_NAMES: [&str; 16] = [
    "Alex", "Jordan", "Morgan", "Taylor", "Casey", "Quinn", "Riley", "Avery", "Cameron", "Hayden",
    "Reese", "Finley", "Dakota", "Robin", "Harper", "Emerson",
];

pub const MAX_AGENT_COUNT: usize = 8;

const POSTGRADUATE_OCCUPATIONS: [Occupation; 7] = [
    Occupation::SchoolAdministrator,
    Occupation::UniversityProfessor,
    Occupation::CivilServant,
    Occupation::NgoWorker,
    Occupation::CorporateExecutive,
    Occupation::HealthcareProfessional,
    Occupation::Lawyer,
];

const DOCTORAL_OCCUPATIONS: [Occupation; 4] = [
    Occupation::UniversityProfessor,
    Occupation::NgoWorker,
    Occupation::CorporateExecutive,
    Occupation::LocalGovernmentOfficial,
];

/// Generates `count` profiles (clamped to 1..=8) with distinct ids and
/// distinct names for a given seed.
pub fn generate_profiles(seed: u64, count: usize) -> Vec<ParticipantProfile> {
    let count = count.clamp(1, MAX_AGENT_COUNT);
    let names = sample_distinct_names(seed, count);

    let mut profiles = Vec::with_capacity(count);
    for index in 0..count {
        let stream_base = (index as u64) * 100;
        let age = sample_range_i64(seed, stream_base + 1, 25, 70) as u8;
        let education = sample_education(seed, stream_base + 2, age);
        let occupation = sample_occupation(seed, stream_base + 3, education);
        let socioeconomic_status = SocioeconomicStatus::ALL
            [sample_index(seed, stream_base + 4, SocioeconomicStatus::ALL.len())];
        let political_stance =
            PoliticalStance::ALL[sample_index(seed, stream_base + 5, PoliticalStance::ALL.len())];

        profiles.push(ParticipantProfile {
            id: format!("agent_{}", index + 1),
            name: names[index].to_string(),
            age,
            education,
            occupation,
            socioeconomic_status,
            political_stance,
        });
    }

    ensure_wing_diversity(seed, &mut profiles);
    profiles
}

fn sample_distinct_names(seed: u64, count: usize) -> Vec<&'static str> {
    // Seeded Fisher-Yates over the name pool, then take the prefix.
    let mut pool = FIRST_NAMES.to_vec();
    for index in (1..pool.len()).rev() {
        let swap_with = (mix_seed(seed, 50 + index as u64) % (index as u64 + 1)) as usize;
        pool.swap(index, swap_with);
    }
    pool.truncate(count);
    pool
}

fn sample_education(seed: u64, stream: u64, age: u8) -> EducationLevel {
    let ceiling = if age < 30 {
        EducationLevel::UNDERGRADUATE_TIER
    } else if age < 40 {
        EducationLevel::MASTERS_TIER
    } else {
        EducationLevel::ALL.len()
    };
    EducationLevel::ALL[sample_index(seed, stream, ceiling)]
}

fn sample_occupation(seed: u64, stream: u64, education: EducationLevel) -> Occupation {
    if education.is_doctoral() {
        DOCTORAL_OCCUPATIONS[sample_index(seed, stream, DOCTORAL_OCCUPATIONS.len())]
    } else if education.is_postgraduate() {
        POSTGRADUATE_OCCUPATIONS[sample_index(seed, stream, POSTGRADUATE_OCCUPATIONS.len())]
    } else {
        Occupation::ALL[sample_index(seed, stream, Occupation::ALL.len())]
    }
}

/// Rewrites stances until every wing is present, preferring wingless
/// profiles and never touching a wing's sole anchor. Rosters smaller than
/// the number of wings cover as many as they can hold.
fn ensure_wing_diversity(seed: u64, profiles: &mut [ParticipantProfile]) {
    for wing in StanceWing::ALL {
        let covered = profiles
            .iter()
            .any(|profile| profile.political_stance.wing() == Some(wing));
        if covered {
            continue;
        }

        let candidate = profiles
            .iter()
            .position(|profile| profile.political_stance.wing().is_none())
            .or_else(|| {
                profiles.iter().position(|profile| {
                    let Some(own_wing) = profile.political_stance.wing() else {
                        return false;
                    };
                    profiles
                        .iter()
                        .filter(|other| other.political_stance.wing() == Some(own_wing))
                        .count()
                        > 1
                })
            });

        if let Some(index) = candidate {
            profiles[index].political_stance = stance_for_wing(seed, index as u64, wing);
        }
    }
}

fn stance_for_wing(seed: u64, stream: u64, wing: StanceWing) -> PoliticalStance {
    let candidates: &[PoliticalStance] = match wing {
        StanceWing::Conservative => &[
            PoliticalStance::Conservative,
            PoliticalStance::ModerateConservative,
        ],
        StanceWing::Moderate => &[PoliticalStance::Moderate, PoliticalStance::ModerateLiberal],
        StanceWing::Progressive => &[
            PoliticalStance::Liberal,
            PoliticalStance::Progressive,
            PoliticalStance::Socialist,
        ],
    };
    candidates[sample_index(seed, 70 + stream, candidates.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn rosters_are_deterministic_per_seed() {
        assert_eq!(generate_profiles(1337, 4), generate_profiles(1337, 4));
        assert_ne!(generate_profiles(1337, 4), generate_profiles(1338, 4));
    }

    #[test]
    fn ids_and_names_are_distinct() {
        for seed in [1, 7, 1337, 900_000_001] {
            let profiles = generate_profiles(seed, MAX_AGENT_COUNT);
            let ids: BTreeSet<_> = profiles.iter().map(|profile| &profile.id).collect();
            let names: BTreeSet<_> = profiles.iter().map(|profile| &profile.name).collect();
            assert_eq!(ids.len(), profiles.len());
            assert_eq!(names.len(), profiles.len());
        }
    }

    #[test]
    fn count_is_clamped_to_supported_range() {
        assert_eq!(generate_profiles(9, 0).len(), 1);
        assert_eq!(generate_profiles(9, 100).len(), MAX_AGENT_COUNT);
    }

    #[test]
    fn age_caps_education_tier() {
        for seed in 0..50 {
            for profile in generate_profiles(seed, 4) {
                if profile.age < 30 {
                    assert!(!profile.education.is_postgraduate());
                }
                if profile.age < 40 {
                    assert!(!profile.education.is_doctoral());
                }
            }
        }
    }

    #[test]
    fn doctoral_profiles_draw_from_the_narrow_occupation_pool() {
        for seed in 0..100 {
            for profile in generate_profiles(seed, 6) {
                if profile.education.is_doctoral() {
                    assert!(DOCTORAL_OCCUPATIONS.contains(&profile.occupation));
                } else if profile.education.is_postgraduate() {
                    assert!(POSTGRADUATE_OCCUPATIONS.contains(&profile.occupation));
                }
            }
        }
    }

    #[test]
    fn rosters_of_three_or_more_cover_every_wing() {
        for seed in 0..100 {
            let profiles = generate_profiles(seed, 4);
            for wing in StanceWing::ALL {
                assert!(
                    profiles
                        .iter()
                        .any(|profile| profile.political_stance.wing() == Some(wing)),
                    "seed {seed} missing wing {wing:?}"
                );
            }
        }
    }
}
