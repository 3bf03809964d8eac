//! Maps participant profiles to a preferred option per policy area. The
//! tendency arithmetic runs in fixed-point hundredths so the seeded jitter
//! stays integral: base stance tendency, occupation adjustment, special
//! interests, then bucketing into options 1..3.

use std::collections::BTreeMap;

use contracts::{Occupation, ParticipantProfile, PoliticalStance, PolicyArea};

use crate::sampling::{sample_index, sample_range_i64, stable_str_hash};

const SPECIAL_INTEREST_BONUS: i64 = 50;
const JITTER: i64 = 50;

/// Hundredths. Option buckets: < 150 -> 1, < 250 -> 2, otherwise 3.
fn stance_tendency(stance: PoliticalStance) -> i64 {
    match stance {
        PoliticalStance::Conservative => 130,
        PoliticalStance::ModerateConservative => 165,
        PoliticalStance::Moderate => 200,
        PoliticalStance::ModerateLiberal => 215,
        PoliticalStance::Liberal => 230,
        PoliticalStance::Progressive => 250,
        PoliticalStance::Socialist => 270,
        PoliticalStance::Libertarian => 160,
        PoliticalStance::Centrist => 200,
        PoliticalStance::Pragmatist => 200,
    }
}

fn occupation_adjustment(occupation: Occupation) -> i64 {
    match occupation {
        Occupation::NgoWorker | Occupation::Teacher | Occupation::SocialWorker => 30,
        Occupation::CivilServant | Occupation::UniversityProfessor => 10,
        Occupation::SmallBusinessOwner | Occupation::CorporateExecutive => -20,
        _ => 0,
    }
}

/// Areas this profile cares extra about: occupation-tied interests plus one
/// seeded pick for postgraduates.
fn special_interests(profile: &ParticipantProfile, seed: u64) -> Vec<PolicyArea> {
    let mut interests = Vec::new();

    if profile.education.is_postgraduate() {
        let stream = stable_str_hash(&profile.id);
        interests.push(PolicyArea::ALL[sample_index(seed, stream, PolicyArea::ALL.len())]);
    }

    match profile.occupation {
        Occupation::NgoWorker => interests.push(PolicyArea::PsychosocialSupport),
        Occupation::CivilServant => interests.push(PolicyArea::Certification),
        Occupation::UniversityProfessor => interests.push(PolicyArea::CurriculumAdaptation),
        _ => {}
    }

    interests
}

fn bucket(tendency: i64) -> u8 {
    if tendency < 150 {
        1
    } else if tendency < 250 {
        2
    } else {
        3
    }
}

/// Preferred option for every catalog area for one profile.
pub fn generate_profile_preferences(
    seed: u64,
    profile: &ParticipantProfile,
) -> BTreeMap<PolicyArea, u8> {
    let base =
        stance_tendency(profile.political_stance) + occupation_adjustment(profile.occupation);
    let interests = special_interests(profile, seed);
    let profile_stream = stable_str_hash(&profile.id);

    PolicyArea::ALL
        .iter()
        .enumerate()
        .map(|(area_index, area)| {
            let mut tendency = base;
            if interests.contains(area) {
                tendency += SPECIAL_INTEREST_BONUS;
            }
            tendency += sample_range_i64(
                seed,
                profile_stream.wrapping_add(area_index as u64 + 1),
                -JITTER,
                JITTER,
            );
            (*area, bucket(tendency))
        })
        .collect()
}

/// Preferences for a whole roster, keyed by participant id. Generated once
/// per session and immutable afterwards.
pub fn generate_preferences(
    seed: u64,
    profiles: &[ParticipantProfile],
) -> BTreeMap<String, BTreeMap<PolicyArea, u8>> {
    profiles
        .iter()
        .map(|profile| (profile.id.clone(), generate_profile_preferences(seed, profile)))
        .collect()
}
