//! The journal mindmap scene: processed entries loaded from disk, one orb per
//! entry, and the selection subsystem that pins entries for the optimizer.

mod dataset;
mod emotion;
mod scene;

pub use dataset::{
    Coordinates, DatasetError, EntityMentions, EntryId, JournalEntry, load_entries, parse_entries,
};
pub use emotion::{Emotion, EmotionScores, OrbAppearance, orb_appearance};
pub use scene::{MindmapScene, SceneError, Selection};
