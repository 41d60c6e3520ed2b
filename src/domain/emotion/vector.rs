//! Emotion Vector - 情感向量归一化
//!
//! 8 个情感因子按固定顺序排列：
//! happy, angry, sad, afraid, disgusted, melancholic, surprised, calm

/// 情感维度数
pub const EMOTION_DIMENSIONS: usize = 8;

/// 情感因子名称（固定顺序，与引擎的向量维度一一对应）
pub const EMOTION_NAMES: [&str; EMOTION_DIMENSIONS] = [
    "happy",
    "angry",
    "sad",
    "afraid",
    "disgusted",
    "melancholic",
    "surprised",
    "calm",
];

/// 每个维度的权重系数
pub const EMOTION_WEIGHTS: [f64; EMOTION_DIMENSIONS] =
    [0.75, 0.70, 0.80, 0.80, 0.75, 0.75, 0.55, 0.45];

/// 加权后的总强度上限
pub const MAX_EMOTION_INTENSITY: f64 = 0.8;

/// 情感因子输入（按 EMOTION_NAMES 顺序）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionFactors([f64; EMOTION_DIMENSIONS]);

impl EmotionFactors {
    pub fn new(values: [f64; EMOTION_DIMENSIONS]) -> Self {
        Self(values)
    }

    /// 归一化为引擎可接受的情感向量
    pub fn normalize(&self) -> EmotionVector {
        normalize_emotion_vector(&self.0)
    }
}

/// 归一化后的情感向量
///
/// 不变量（输入非负时）:
/// - 每个分量 >= 0
/// - 分量之和 <= 0.8
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionVector([f64; EMOTION_DIMENSIONS]);

impl EmotionVector {
    pub fn values(&self) -> &[f64; EMOTION_DIMENSIONS] {
        &self.0
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }
}

/// 情感向量归一化
///
/// 1. 逐维乘以 EMOTION_WEIGHTS
/// 2. 若加权和超过 0.8，则等比缩放使总和恰好为 0.8
pub fn normalize_emotion_vector(input: &[f64; EMOTION_DIMENSIONS]) -> EmotionVector {
    let mut weighted = [0.0; EMOTION_DIMENSIONS];
    for (i, value) in input.iter().enumerate() {
        weighted[i] = EMOTION_WEIGHTS[i] * value;
    }

    let sum: f64 = weighted.iter().sum();
    if sum > MAX_EMOTION_INTENSITY {
        // 先除以最大分量，避免极大输入的加权和溢出为 inf
        let peak = weighted.iter().cloned().fold(0.0, f64::max);
        for component in weighted.iter_mut() {
            *component /= peak;
        }
        let scale = MAX_EMOTION_INTENSITY / weighted.iter().sum::<f64>();
        for component in weighted.iter_mut() {
            *component *= scale;
        }
    }

    EmotionVector(weighted)
}
