//! Native stem fetching and decoding, for server-side rendering and CLI
//! tooling. The browser build never compiles this; there the host fetches
//! and decodes through the web audio stack and feeds
//! [`StemPlayer::deliver_stem`](super::engine::StemPlayer::deliver_stem)
//! directly.

use std::io::Cursor;
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::backend::AudioData;
use super::engine::StemDescriptor;
use crate::error::{DecodeError, LoadError};

/// Decoded interleaved PCM, normalized to `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    pub samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl PcmBuffer {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }
}

impl AudioData for PcmBuffer {
    fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }
}

/// Downloads stem bytes over HTTP (with an on-disk cache keyed by URL hash)
/// or reads them from the local filesystem.
#[derive(Debug, Clone)]
pub struct StemFetcher {
    client: reqwest::Client,
    cache_dir: Option<PathBuf>,
}

impl StemFetcher {
    pub fn new() -> Self {
        let cache_dir = directories::ProjectDirs::from("org", "stemnote", "stemnote")
            .map(|dirs| dirs.cache_dir().join("stems"));
        StemFetcher {
            client: reqwest::Client::new(),
            cache_dir,
        }
    }

    /// Fetch one stem's bytes. HTTP(S) paths go through the cache; anything
    /// else is treated as a filesystem path.
    pub async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        if !path.starts_with("http://") && !path.starts_with("https://") {
            return tokio::fs::read(path).await.map_err(|err| LoadError::Io {
                path: path.to_string(),
                detail: err.to_string(),
            });
        }

        if let Some(cached) = self.read_cache(path).await {
            debug!(url = path, "stem cache hit");
            return Ok(cached);
        }

        let response = self
            .client
            .get(path)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|err| LoadError::Http {
                url: path.to_string(),
                detail: err.to_string(),
            })?;
        let bytes = response.bytes().await.map_err(|err| LoadError::Http {
            url: path.to_string(),
            detail: err.to_string(),
        })?;

        self.write_cache(path, &bytes).await;
        Ok(bytes.to_vec())
    }

    /// Fetch every stem concurrently. Results come back in stem order; a
    /// failed fetch occupies its slot as an error rather than aborting the
    /// rest.
    pub async fn fetch_all(
        &self,
        stems: &[StemDescriptor],
    ) -> Vec<(usize, Result<Vec<u8>, LoadError>)> {
        let mut tasks = tokio::task::JoinSet::new();
        for (index, stem) in stems.iter().enumerate() {
            let fetcher = self.clone();
            let path = stem.path.clone();
            tasks.spawn(async move { (index, fetcher.fetch_bytes(&path).await) });
        }

        let mut results = Vec::with_capacity(stems.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(entry) => results.push(entry),
                Err(err) => warn!(%err, "stem fetch task panicked"),
            }
        }
        results.sort_by_key(|(index, _)| *index);
        results
    }

    fn cache_path(&self, url: &str) -> Option<PathBuf> {
        let dir = self.cache_dir.as_ref()?;
        let hash = Sha256::digest(url.as_bytes());
        let name: String = hash.iter().map(|b| format!("{b:02x}")).collect();
        Some(dir.join(name))
    }

    async fn read_cache(&self, url: &str) -> Option<Vec<u8>> {
        let path = self.cache_path(url)?;
        tokio::fs::read(path).await.ok()
    }

    /// Best effort; a failed cache write only costs a re-download.
    async fn write_cache(&self, url: &str, bytes: &[u8]) {
        let Some(path) = self.cache_path(url) else {
            return;
        };
        if let Some(dir) = path.parent() {
            if let Err(err) = tokio::fs::create_dir_all(dir).await {
                warn!(%err, "cannot create stem cache dir");
                return;
            }
        }
        if let Err(err) = tokio::fs::write(&path, bytes).await {
            warn!(%err, "cannot write stem cache entry");
        }
    }
}

impl Default for StemFetcher {
    fn default() -> Self {
        StemFetcher::new()
    }
}

/// Decode stem bytes into PCM. WAV is detected by its RIFF header;
/// everything else is tried as MP3.
pub fn decode_stem(bytes: &[u8]) -> Result<PcmBuffer, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyStream);
    }
    if bytes.starts_with(b"RIFF") {
        decode_wav(bytes)
    } else {
        decode_mp3(bytes)
    }
}

fn decode_wav(bytes: &[u8]) -> Result<PcmBuffer, DecodeError> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes)).map_err(|err| {
        DecodeError::Corrupt {
            detail: err.to_string(),
        }
    })?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|err| DecodeError::Corrupt {
                detail: err.to_string(),
            })?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|err| DecodeError::Corrupt {
                    detail: err.to_string(),
                })?
        }
    };

    Ok(PcmBuffer {
        samples,
        channels: spec.channels,
        sample_rate: spec.sample_rate,
    })
}

fn decode_mp3(bytes: &[u8]) -> Result<PcmBuffer, DecodeError> {
    let mut decoder = minimp3::Decoder::new(Cursor::new(bytes));
    let mut samples = Vec::new();
    let mut channels = 0u16;
    let mut sample_rate = 0u32;

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                if channels == 0 {
                    channels = frame.channels as u16;
                    sample_rate = frame.sample_rate as u32;
                }
                samples.extend(frame.data.iter().map(|&s| s as f32 / 32768.0));
            }
            Err(minimp3::Error::Eof) => break,
            Err(err) => {
                return Err(DecodeError::Corrupt {
                    detail: format!("{err:?}"),
                });
            }
        }
    }

    if samples.is_empty() {
        return Err(DecodeError::UnsupportedFormat {
            detail: "no decodable audio frames".to_string(),
        });
    }
    Ok(PcmBuffer {
        samples,
        channels,
        sample_rate,
    })
}
