//! SpeechGate Reference Client
//!
//! 依次跑四个固定场景（speaker / reference / vector / text），输出写入 outputs 目录
//!
//! **Usage:**
//! ```bash
//! speechgate-client --base-url http://localhost:9010 --examples-dir ./samples --outputs-dir ./outputs
//! ```

use anyhow::{bail, Context};
use clap::Parser;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use speechgate::client::{
    ReferenceRequest, RequestBase, SynthesisClient, TextRequest, VectorRequest,
};
use speechgate::domain::emotion::EMOTION_NAMES;
use speechgate::domain::synthesis::GenerationParams;

/// Run the four synthesis scenarios against a running server
#[derive(Parser, Debug)]
#[clap(name = "speechgate-client")]
#[clap(about = "Exercise the SpeechGate synthesis endpoints with four fixed scenarios")]
struct Args {
    /// Base URL of the HTTP service
    #[clap(long, env = "SPEECHGATE_BASE_URL", default_value = "http://localhost:9010")]
    base_url: String,

    /// Directory holding voice_01..04.wav and emo_hate.wav
    #[clap(long, value_name = "DIR", default_value = "samples")]
    examples_dir: PathBuf,

    /// Directory the synthesized wav files are written to
    #[clap(long, value_name = "DIR", default_value = "outputs")]
    outputs_dir: PathBuf,
}

fn read_sample(dir: &Path, name: &str) -> anyhow::Result<Vec<u8>> {
    let path = dir.join(name);
    if !path.is_file() {
        bail!("Missing file: {}", path.display());
    }
    std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))
}

fn base(prompt: &[u8], text: &str) -> RequestBase {
    RequestBase::new(prompt, text)
        .with_max_text_tokens(120)
        .with_generation(GenerationParams::default())
}

fn save(outputs_dir: &Path, name: &str, audio: &[u8]) -> anyhow::Result<()> {
    let path = outputs_dir.join(name);
    std::fs::write(&path, audio).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Saved: {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    std::fs::create_dir_all(&args.outputs_dir)?;
    let client = SynthesisClient::new(&args.base_url)?;

    // Case 1: speaker
    let prompt = read_sample(&args.examples_dir, "voice_01.wav")?;
    println!("Running: case1 speaker...");
    let audio = client
        .speaker(&base(&prompt, "Translate for me, what is a surprise!"))
        .await
        .context("speaker failed")?;
    save(&args.outputs_dir, "speaker.wav", &audio)?;

    // Case 2: reference
    let prompt = read_sample(&args.examples_dir, "voice_02.wav")?;
    let emotion = read_sample(&args.examples_dir, "emo_hate.wav")?;
    println!("Running: case2 reference...");
    let request = ReferenceRequest::new(
        base(&prompt, "你看看你，对我还有没有一点父子之间的信任了。"),
        &emotion,
        1.0,
    );
    let audio = client.reference(&request).await.context("reference failed")?;
    save(&args.outputs_dir, "reference.wav", &audio)?;

    // Case 3: vector (surprised=1.0)
    let prompt = read_sample(&args.examples_dir, "voice_03.wav")?;
    println!("Running: case3 vector...");
    let mut emotion_factors: BTreeMap<String, f64> =
        EMOTION_NAMES.iter().map(|name| (name.to_string(), 0.0)).collect();
    emotion_factors.insert("surprised".to_string(), 1.0);
    let request = VectorRequest {
        base: base(&prompt, "哇塞！这个爆率也太高了！欧皇附体了！"),
        emotion_factors,
        emotion_random: false,
    };
    let audio = client.vector(&request).await.context("vector failed")?;
    save(&args.outputs_dir, "vector.wav", &audio)?;

    // Case 4: text
    let prompt = read_sample(&args.examples_dir, "voice_04.wav")?;
    println!("Running: case4 text...");
    let request = TextRequest {
        base: base(&prompt, "这些年的时光终究是错付了... "),
        emotion_text: Some("极度悲伤".to_string()),
        emotion_random: false,
    };
    let audio = client.text(&request).await.context("text failed")?;
    save(&args.outputs_dir, "text.wav", &audio)?;

    println!("Done.");
    Ok(())
}
