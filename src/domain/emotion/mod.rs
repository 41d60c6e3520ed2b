//! Emotion Context - 情感控制
//!
//! 职责:
//! - 情感因子 -> 有界情感向量

mod vector;

pub use vector::{
    normalize_emotion_vector, EmotionFactors, EmotionVector, EMOTION_DIMENSIONS, EMOTION_NAMES,
    EMOTION_WEIGHTS, MAX_EMOTION_INTENSITY,
};
