//! Weighted lexical signal tables
//!
//! Every entry is stored in normalized form (lowercase, ASCII apostrophe) and may be a
//! single token or a multi-word phrase. Each distinct entry counts at most once per text.

use crate::text::NormalizedText;

/// A weighted signal set with its saturation constant
#[derive(Debug, Clone, Copy)]
pub struct Lexicon {
    pub entries: &'static [(&'static str, f64)],
    /// Matched weight that maps to a score of 1.0
    pub saturation: f64,
}

impl Lexicon {
    /// Sum of weights of all entries present in the text
    pub fn matched_weight(&self, text: &NormalizedText) -> f64 {
        sum_matches(self.entries, text)
    }

    /// Saturated score in `[0.0, 1.0]`
    pub fn score(&self, text: &NormalizedText) -> f64 {
        saturate(self.matched_weight(text), self.saturation)
    }
}

/// Emotion signal: polarity terms plus cue phrases.
///
/// Polarity terms contribute the magnitude of the net polarity. Cues (self-report phrases,
/// intensifiers) only amplify a text that already carries net polarity; a tie between
/// positive and negative weight is neutral.
#[derive(Debug, Clone, Copy)]
pub struct PolarityLexicon {
    pub positive: &'static [(&'static str, f64)],
    pub negative: &'static [(&'static str, f64)],
    pub cues: &'static [(&'static str, f64)],
    pub saturation: f64,
}

impl PolarityLexicon {
    /// Net polarity: positive weight minus negative weight
    pub fn net_polarity(&self, text: &NormalizedText) -> f64 {
        sum_matches(self.positive, text) - sum_matches(self.negative, text)
    }

    pub fn score(&self, text: &NormalizedText) -> f64 {
        let net = self.net_polarity(text);
        if net.abs() < f64::EPSILON {
            return 0.0;
        }
        saturate(net.abs() + sum_matches(self.cues, text), self.saturation)
    }
}

fn sum_matches(entries: &[(&str, f64)], text: &NormalizedText) -> f64 {
    entries
        .iter()
        .filter(|(entry, _)| text.contains(entry))
        .map(|(_, weight)| weight)
        .sum()
}

fn saturate(weight: f64, saturation: f64) -> f64 {
    if saturation <= 0.0 || !weight.is_finite() {
        return 0.0;
    }
    (weight / saturation).clamp(0.0, 1.0)
}

/// Emotion-bearing terms and self-report cues (scored on user input)
pub const EMOTION: PolarityLexicon = PolarityLexicon {
    positive: &[
        ("happy", 1.0),
        ("grateful", 1.0),
        ("joy", 1.0),
        ("joyful", 1.0),
        ("excited", 1.0),
        ("delighted", 1.0),
        ("thankful", 0.9),
        ("glad", 0.8),
        ("love", 0.8),
        ("hopeful", 0.7),
        ("relieved", 0.7),
        ("proud", 0.7),
        ("peaceful", 0.6),
    ],
    negative: &[
        ("sad", 1.0),
        ("angry", 1.0),
        ("anxious", 1.0),
        ("overwhelmed", 1.0),
        ("scared", 1.0),
        ("afraid", 1.0),
        ("terrified", 1.0),
        ("depressed", 1.0),
        ("hopeless", 1.0),
        ("miserable", 1.0),
        ("grief", 1.0),
        ("upset", 0.9),
        ("worried", 0.9),
        ("frustrated", 0.9),
        ("hurt", 0.9),
        ("lonely", 0.9),
        ("stressed", 0.9),
        ("pain", 0.8),
    ],
    cues: &[
        ("i feel", 0.5),
        ("i'm feeling", 0.5),
        ("i am feeling", 0.5),
        ("makes me", 0.3),
        ("i feel so", 0.2),
        ("really", 0.25),
        ("very", 0.25),
        ("extremely", 0.3),
        ("deeply", 0.3),
    ],
    saturation: 3.0,
};

/// Compassion-indicating terms and phrases (scored on system response)
pub const COMPASSION: Lexicon = Lexicon {
    entries: &[
        ("understand", 0.5),
        ("hear", 0.5),
        ("support", 0.5),
        ("care", 0.5),
        ("empathy", 0.5),
        ("compassion", 0.5),
        ("kindness", 0.5),
        ("comfort", 0.5),
        ("together", 0.5),
        ("pain", 0.5),
        ("alone", 0.5),
        ("lonely", 0.5),
        ("hurt", 0.5),
        ("help", 0.4),
        ("sorry", 0.4),
        ("journey", 0.4),
        ("feelings", 0.4),
        ("share", 0.3),
        ("i hear you", 1.0),
        ("i hear your pain", 1.0),
        ("not alone", 1.0),
        ("i am here for you", 1.0),
        ("we are in this together", 1.0),
        ("i understand", 0.8),
        ("i want you to know", 0.8),
        ("i'm here", 0.8),
        ("let me help", 0.8),
        ("i care", 0.8),
        ("i can see", 0.5),
    ],
    saturation: 4.0,
};

/// Mindfulness-indicating terms and phrases (scored on system response)
pub const MINDFULNESS: Lexicon = Lexicon {
    entries: &[
        ("breathe", 0.5),
        ("breath", 0.5),
        ("present", 0.5),
        ("moment", 0.5),
        ("aware", 0.5),
        ("awareness", 0.5),
        ("calm", 0.5),
        ("peace", 0.5),
        ("reflect", 0.5),
        ("mindful", 0.6),
        ("meditate", 0.6),
        ("observe", 0.4),
        ("notice", 0.4),
        ("centered", 0.4),
        ("grounded", 0.4),
        ("accept", 0.4),
        ("focus", 0.3),
        ("quiet", 0.3),
        ("release", 0.3),
        ("balance", 0.3),
        ("gently", 0.3),
        ("take a moment", 1.0),
        ("let's breathe", 1.0),
        ("be present", 1.0),
        ("take a breath", 1.0),
        ("in this moment", 0.8),
        ("notice how", 0.6),
        ("let go", 0.6),
        ("focus on", 0.5),
        ("pay attention", 0.5),
        ("right now", 0.4),
    ],
    saturation: 3.0,
};
