//! Plutchik emotion scores and the orb appearance derived from them.

use mindmap_config::SceneConfig;
use serde::Deserialize;

/// The eight Plutchik primary emotions, in pipeline declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Emotion {
    Joy,
    Trust,
    Fear,
    Surprise,
    Sadness,
    Disgust,
    Anger,
    Anticipation,
}

impl Emotion {
    pub const ALL: [Emotion; 8] = [
        Emotion::Joy,
        Emotion::Trust,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Sadness,
        Emotion::Disgust,
        Emotion::Anger,
        Emotion::Anticipation,
    ];

    /// Linear RGB color used for orbs dominated by this emotion.
    pub fn color(self) -> [f32; 3] {
        match self {
            Emotion::Joy => [1.0, 0.85, 0.2],
            Emotion::Trust => [0.5, 0.8, 0.3],
            Emotion::Fear => [0.1, 0.6, 0.4],
            Emotion::Surprise => [0.2, 0.7, 0.9],
            Emotion::Sadness => [0.2, 0.35, 0.85],
            Emotion::Disgust => [0.6, 0.3, 0.7],
            Emotion::Anger => [0.9, 0.2, 0.2],
            Emotion::Anticipation => [1.0, 0.55, 0.15],
        }
    }
}

/// Color for entries with no emotional signal.
pub const NEUTRAL_COLOR: [f32; 3] = [0.7, 0.7, 0.75];

/// Per-emotion intensities of one entry. Missing emotions are zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EmotionScores {
    #[serde(alias = "Joy")]
    pub joy: f32,
    #[serde(alias = "Trust")]
    pub trust: f32,
    #[serde(alias = "Fear")]
    pub fear: f32,
    #[serde(alias = "Surprise")]
    pub surprise: f32,
    #[serde(alias = "Sadness")]
    pub sadness: f32,
    #[serde(alias = "Disgust")]
    pub disgust: f32,
    #[serde(alias = "Anger")]
    pub anger: f32,
    #[serde(alias = "Anticipation")]
    pub anticipation: f32,
}

impl EmotionScores {
    pub fn get(&self, emotion: Emotion) -> f32 {
        match emotion {
            Emotion::Joy => self.joy,
            Emotion::Trust => self.trust,
            Emotion::Fear => self.fear,
            Emotion::Surprise => self.surprise,
            Emotion::Sadness => self.sadness,
            Emotion::Disgust => self.disgust,
            Emotion::Anger => self.anger,
            Emotion::Anticipation => self.anticipation,
        }
    }

    fn get_mut(&mut self, emotion: Emotion) -> &mut f32 {
        match emotion {
            Emotion::Joy => &mut self.joy,
            Emotion::Trust => &mut self.trust,
            Emotion::Fear => &mut self.fear,
            Emotion::Surprise => &mut self.surprise,
            Emotion::Sadness => &mut self.sadness,
            Emotion::Disgust => &mut self.disgust,
            Emotion::Anger => &mut self.anger,
            Emotion::Anticipation => &mut self.anticipation,
        }
    }

    /// Copy with every intensity clamped to `[0, 1]`; NaN becomes 0.
    pub fn clamped(mut self) -> Self {
        for emotion in Emotion::ALL {
            let value = self.get_mut(emotion);
            *value = if value.is_nan() {
                0.0
            } else {
                value.clamp(0.0, 1.0)
            };
        }
        self
    }

    /// Strongest emotion and its intensity, or `None` when all are zero.
    ///
    /// Ties go to the emotion declared first.
    pub fn dominant(&self) -> Option<(Emotion, f32)> {
        let mut best: Option<(Emotion, f32)> = None;
        for emotion in Emotion::ALL {
            let value = self.get(emotion);
            if value > best.map_or(0.0, |(_, v)| v) {
                best = Some((emotion, value));
            }
        }
        best
    }
}

/// Visual parameters of one entry orb.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbAppearance {
    pub radius: f32,
    pub color: [f32; 3],
    pub opacity: f32,
    pub emissive_intensity: f32,
}

/// Size and color an orb from its emotion scores.
pub fn orb_appearance(scores: &EmotionScores, scene: &SceneConfig) -> OrbAppearance {
    let (color, intensity) = match scores.dominant() {
        Some((emotion, intensity)) => (emotion.color(), intensity),
        None => (NEUTRAL_COLOR, 0.0),
    };
    OrbAppearance {
        radius: scene.base_orb_radius + intensity * scene.orb_radius_scale,
        color,
        opacity: scene.base_opacity,
        emissive_intensity: intensity * 0.5,
    }
}
