//! Implements `MediaResolver` by running the `yt-dlp` command-line tool and parsing
//! its single-JSON output.

use std::process::Command;
use tracing::{debug, info, warn};

use super::{ExtractOptions, MediaInfo, MediaResolver, ResolutionError};

/// Resolver backed by a local `yt-dlp` executable.
#[derive(Debug, Clone)]
pub struct YtDlpResolver {
    binary: String,
}

impl Default for YtDlpResolver {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

impl YtDlpResolver {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Arguments passed to `yt-dlp` for a given query.
    fn build_args(query: &str, options: ExtractOptions) -> Vec<String> {
        let mut args: Vec<String> = [
            "-J", // Dump a single JSON document
            "--quiet",
            "--no-warnings",
            "-f",
            "bestaudio/best",
            "--default-search",
            "auto",
            "--geo-bypass",
            "--age-limit",
            "0",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        if options.flat {
            args.push("--flat-playlist".to_string());
        }
        args.push(if options.single {
            "--no-playlist".to_string()
        } else {
            "--yes-playlist".to_string()
        });

        // Queries come from chat; never let one be read as a flag.
        args.push("--".to_string());
        args.push(query.to_string());
        args
    }

    /// Turn a finished `yt-dlp` run into metadata or a typed failure.
    fn interpret(
        success: bool,
        stdout: &[u8],
        stderr: &[u8],
    ) -> Result<MediaInfo, ResolutionError> {
        if !success {
            let stderr = String::from_utf8_lossy(stderr);
            let reason = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .map(|line| line.trim().trim_start_matches("ERROR:").trim().to_string())
                .filter(|line| !line.is_empty());

            return Err(match reason {
                Some(reason) => ResolutionError::Unavailable(reason),
                None => ResolutionError::NoData,
            });
        }

        MediaInfo::from_json(&String::from_utf8_lossy(stdout))
    }
}

impl MediaResolver for YtDlpResolver {
    fn extract(&self, query: &str, options: ExtractOptions) -> Result<MediaInfo, ResolutionError> {
        info!("Extracting media info for '{}' ({:?})", query, options);

        let output = Command::new(&self.binary)
            .args(Self::build_args(query, options))
            .output()
            .map_err(|e| ResolutionError::Process(format!("{}: {}", self.binary, e)))?;

        let result = Self::interpret(output.status.success(), &output.stdout, &output.stderr);
        match &result {
            Ok(info) => debug!(
                "Resolved '{}' to '{}' ({} entries)",
                query,
                info.title_or_default(),
                info.entries.as_ref().map_or(0, Vec::len)
            ),
            Err(e) => warn!("Failed to resolve '{}': {}", query, e),
        }
        result
    }
}
