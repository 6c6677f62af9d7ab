//! Seeded synthetic journal used when no processed dataset is available.

use mindmap_scene::{Coordinates, Emotion, EmotionScores, EntityMentions, EntryId, JournalEntry};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

const CLUSTERS: usize = 8;
const RELATED_PER_ENTRY: usize = 5;
/// Half-extent of the cluster-center volume, in world units.
const SPREAD: f32 = 60.0;
const CLUSTER_RADIUS: f32 = 6.0;

const TOPICS: [&str; 6] = ["art", "business", "celebrity", "film", "fashion", "travel"];

/// Generate `count` entries grouped into topical clusters.
///
/// Each entry relates to other entries of its own cluster, the way the
/// similarity pass links neighbors in embedding space.
pub fn generate(count: usize, seed: u64) -> Vec<JournalEntry> {
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);

    let centers: Vec<[f32; 3]> = (0..CLUSTERS)
        .map(|_| {
            [
                rng.gen_range(-SPREAD..=SPREAD),
                rng.gen_range(-SPREAD * 0.3..=SPREAD * 0.3),
                rng.gen_range(-SPREAD..=SPREAD),
            ]
        })
        .collect();

    (0..count)
        .map(|i| {
            let cluster = i % CLUSTERS;
            let center = centers[cluster];
            let coordinates = Coordinates {
                x: center[0] + rng.gen_range(-CLUSTER_RADIUS..=CLUSTER_RADIUS),
                y: center[1] + rng.gen_range(-CLUSTER_RADIUS..=CLUSTER_RADIUS),
                z: center[2] + rng.gen_range(-CLUSTER_RADIUS..=CLUSTER_RADIUS),
            };

            let related_entries = (0..RELATED_PER_ENTRY)
                .map(|_| {
                    let k = rng.gen_range(0..count.div_ceil(CLUSTERS));
                    (k * CLUSTERS + cluster).min(count - 1)
                })
                .filter(|&j| j != i)
                .map(|j| EntryId::new(j.to_string()))
                .collect();

            JournalEntry {
                id: EntryId::new(i.to_string()),
                date: format!("1978-{:02}-{:02}", i % 12 + 1, i % 28 + 1),
                text: String::new(),
                coordinates: Some(coordinates),
                emotions: random_emotions(&mut rng, cluster),
                topics: vec![TOPICS[cluster % TOPICS.len()].to_string()],
                entities: EntityMentions::default(),
                related_entries,
            }
        })
        .collect()
}

/// Background noise on every emotion plus a strong cluster emotion.
fn random_emotions(rng: &mut Xoshiro256StarStar, cluster: usize) -> EmotionScores {
    let mut scores = EmotionScores {
        joy: rng.gen_range(0.0..0.3),
        trust: rng.gen_range(0.0..0.3),
        fear: rng.gen_range(0.0..0.3),
        surprise: rng.gen_range(0.0..0.3),
        sadness: rng.gen_range(0.0..0.3),
        disgust: rng.gen_range(0.0..0.3),
        anger: rng.gen_range(0.0..0.3),
        anticipation: rng.gen_range(0.0..0.3),
    };
    let strong = rng.gen_range(0.4..=1.0);
    match Emotion::ALL[cluster % Emotion::ALL.len()] {
        Emotion::Joy => scores.joy = strong,
        Emotion::Trust => scores.trust = strong,
        Emotion::Fear => scores.fear = strong,
        Emotion::Surprise => scores.surprise = strong,
        Emotion::Sadness => scores.sadness = strong,
        Emotion::Disgust => scores.disgust = strong,
        Emotion::Anger => scores.anger = strong,
        Emotion::Anticipation => scores.anticipation = strong,
    }
    scores
}
