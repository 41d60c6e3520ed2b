//! Synthesis Context - Value Objects

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// 内容哈希（SHA-256 小写十六进制）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    /// 计算字节内容的哈希
    pub fn of(data: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(data)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// base64 解码失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBase64(pub String);

/// 已解码的音频载荷
///
/// 不变量:
/// - data 非空
/// - hash == sha256(data)
#[derive(Clone, PartialEq, Eq)]
pub struct AudioPayload {
    hash: ContentHash,
    data: Vec<u8>,
}

impl AudioPayload {
    /// 从原始字节创建，空内容返回 None
    pub fn new(data: Vec<u8>) -> Option<Self> {
        if data.is_empty() {
            return None;
        }
        Some(Self {
            hash: ContentHash::of(&data),
            data,
        })
    }

    /// 严格解码标准 base64（带填充，拒绝非字母表字符）
    pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, InvalidBase64> {
        general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| InvalidBase64(e.to_string()))
    }

    pub fn hash(&self) -> &ContentHash {
        &self.hash
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl std::fmt::Debug for AudioPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioPayload")
            .field("hash", &self.hash)
            .field("len", &self.data.len())
            .finish()
    }
}

/// 编码为标准 base64
pub fn encode_base64(data: &[u8]) -> String {
    general_purpose::STANDARD.encode(data)
}

/// 引擎生成参数
///
/// 对本层不透明，只做类型/范围校验后原样传给引擎
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub do_sample: bool,
    pub top_p: f64,
    pub top_k: i64,
    pub temperature: f64,
    pub length_penalty: f64,
    pub num_beams: i64,
    pub repetition_penalty: f64,
    pub max_mel_tokens: i64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            do_sample: true,
            top_p: 0.8,
            top_k: 30,
            temperature: 0.8,
            length_penalty: 0.0,
            num_beams: 3,
            repetition_penalty: 10.0,
            max_mel_tokens: 1500,
        }
    }
}

impl GenerationParams {
    /// 范围校验，返回出错的字段名和原因
    pub fn validate(&self) -> Result<(), (&'static str, &'static str)> {
        let floats = [
            ("top_p", self.top_p),
            ("temperature", self.temperature),
            ("length_penalty", self.length_penalty),
            ("repetition_penalty", self.repetition_penalty),
        ];
        for (name, value) in floats {
            if !value.is_finite() {
                return Err((name, "must be a finite number"));
            }
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(("top_p", "must be in (0, 1]"));
        }
        if self.top_k < 1 {
            return Err(("top_k", "must be >= 1"));
        }
        if self.temperature <= 0.0 {
            return Err(("temperature", "must be > 0"));
        }
        if self.num_beams < 1 {
            return Err(("num_beams", "must be >= 1"));
        }
        if self.repetition_penalty <= 0.0 {
            return Err(("repetition_penalty", "must be > 0"));
        }
        if self.max_mel_tokens < 1 {
            return Err(("max_mel_tokens", "must be >= 1"));
        }
        Ok(())
    }
}
