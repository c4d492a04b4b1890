use std::{
    fmt,
    path::{Path, PathBuf},
};

use anyhow::Context;
use rayon::prelude::*;
use sha2::Digest as _;

use crate::{
    color::policy::ColorFormatPolicy,
    compose::{compositor::Compositor, model::CompositionSpec, source::normalize_rel_path},
    foundation::{
        core::Dimensions,
        error::{ForgeError, ForgeResult},
    },
    pattern::{PatternGenerator, PatternSpec},
    pipeline::manifest::{AssetSource, AssetSpec, Manifest},
    serialize::frame::{WrittenFrame, write_frame_file},
};

#[derive(Clone, Debug, Default)]
/// Batch build knobs.
pub struct BuildOptions {
    /// Build only these assets (by name). Empty means all.
    pub only: Vec<String>,
    /// Build assets on a rayon pool. Reports keep manifest order.
    pub parallel: bool,
    /// Worker count; implies `parallel`.
    pub threads: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Outcome of one artifact.
pub enum AssetStatus {
    /// Written with the expected size.
    Ok,
    /// Written, but something is off (e.g. size mismatch). The file is kept.
    Warning {
        /// Error label, see [`ForgeError::kind`].
        kind: &'static str,
        /// Human-readable detail.
        message: String,
    },
    /// Not written.
    Failed {
        /// Error label, see [`ForgeError::kind`].
        kind: &'static str,
        /// Human-readable detail.
        message: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Per-artifact line of a [`BatchReport`].
pub struct AssetReport {
    /// Asset name from the manifest.
    pub asset: String,
    /// Frame index for series assets.
    pub frame: Option<u32>,
    /// Output path.
    pub output: PathBuf,
    /// `width * height * 2`, once the size validated.
    pub expected_bytes: Option<u64>,
    /// Size on disk after writing.
    pub actual_bytes: Option<u64>,
    /// SHA-256 of the written artifact, lowercase hex.
    pub sha256: Option<String>,
    /// Outcome.
    pub status: AssetStatus,
}

impl AssetReport {
    /// `name` or `name[frame]`.
    pub fn label(&self) -> String {
        match self.frame {
            Some(i) => format!("{}[{i}]", self.asset),
            None => self.asset.clone(),
        }
    }

    /// Whether an artifact was written (possibly with warnings).
    pub fn is_written(&self) -> bool {
        !matches!(self.status, AssetStatus::Failed { .. })
    }

    fn failed(
        asset: &str,
        frame: Option<u32>,
        output: PathBuf,
        expected: Option<u64>,
        err: &ForgeError,
    ) -> Self {
        Self {
            asset: asset.to_owned(),
            frame,
            output,
            expected_bytes: expected,
            actual_bytes: None,
            sha256: None,
            status: AssetStatus::Failed {
                kind: err.kind(),
                message: err.to_string(),
            },
        }
    }
}

impl fmt::Display for AssetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.label();
        match &self.status {
            AssetStatus::Failed { kind, message } => {
                write!(f, "FAILED {label} [{kind}]: {message}")
            }
            status => {
                let tag = if matches!(status, AssetStatus::Ok) {
                    "ok"
                } else {
                    "WARN"
                };
                write!(
                    f,
                    "{tag} {label} -> {} ({} bytes, expected {}, sha256 {})",
                    self.output.display(),
                    self.actual_bytes.unwrap_or(0),
                    self.expected_bytes.unwrap_or(0),
                    self.sha256.as_deref().unwrap_or("-"),
                )?;
                if let AssetStatus::Warning { kind, message } = status {
                    write!(f, " [{kind}]: {message}")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Results of a batch, in manifest order.
pub struct BatchReport {
    /// One entry per artifact (series contribute one per frame).
    pub assets: Vec<AssetReport>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Aggregate counts over a [`BatchReport`].
pub struct BatchSummary {
    /// Artifacts written cleanly.
    pub succeeded: usize,
    /// Artifacts written with warnings.
    pub warnings: usize,
    /// Artifacts not written.
    pub failed: usize,
    /// Bytes written across all artifacts.
    pub total_bytes: u64,
}

impl BatchReport {
    /// Aggregate counts.
    pub fn summary(&self) -> BatchSummary {
        let mut s = BatchSummary::default();
        for r in &self.assets {
            match r.status {
                AssetStatus::Ok => s.succeeded += 1,
                AssetStatus::Warning { .. } => s.warnings += 1,
                AssetStatus::Failed { .. } => s.failed += 1,
            }
            s.total_bytes += r.actual_bytes.unwrap_or(0);
        }
        s
    }

    /// Report for the artifact labelled `label`.
    pub fn get(&self, label: &str) -> Option<&AssetReport> {
        self.assets.iter().find(|r| r.label() == label)
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} artifacts: {} ok, {} with warnings, {} failed, {} bytes written",
            self.succeeded + self.warnings + self.failed,
            self.succeeded,
            self.warnings,
            self.failed,
            self.total_bytes
        )
    }
}

#[derive(Clone, Debug)]
enum Producer {
    Compose(CompositionSpec),
    Pattern(PatternSpec),
}

#[derive(Clone, Debug)]
struct Job {
    asset: String,
    frame: Option<u32>,
    output: PathBuf,
    size: Dimensions,
    policy: ColorFormatPolicy,
    producer: Producer,
}

/// A job, or the report of an asset that failed before any work could be scheduled.
type Planned = Result<Job, AssetReport>;

/// Build every selected asset of `manifest`.
///
/// A failing asset never stops the batch; only option errors (unknown `only` names, bad thread
/// counts) fail the call itself.
#[tracing::instrument(skip_all, fields(assets = manifest.assets.len()))]
pub fn build(manifest: &Manifest, options: &BuildOptions) -> ForgeResult<BatchReport> {
    let root = manifest.root_dir();
    let out_dir = manifest.output_dir();
    let selected = select(manifest, &options.only)?;

    let mut planned = Vec::new();
    for asset in selected {
        plan_asset(asset, &root, &out_dir, &mut planned);
    }

    let reports: Vec<AssetReport> = if options.parallel || options.threads.is_some() {
        let pool = build_thread_pool(options.threads)?;
        pool.install(|| {
            planned
                .par_iter()
                .map_init(|| Compositor::new(&root), run_planned)
                .collect()
        })
    } else {
        let mut compositor = Compositor::new(&root);
        planned
            .iter()
            .map(|p| run_planned(&mut compositor, p))
            .collect()
    };

    for r in &reports {
        match r.status {
            AssetStatus::Ok => tracing::info!("{r}"),
            AssetStatus::Warning { .. } => tracing::warn!("{r}"),
            AssetStatus::Failed { .. } => tracing::error!("{r}"),
        }
    }
    let report = BatchReport { assets: reports };
    tracing::info!("{}", report.summary());
    Ok(report)
}

fn select<'a>(manifest: &'a Manifest, only: &[String]) -> ForgeResult<Vec<&'a AssetSpec>> {
    if only.is_empty() {
        return Ok(manifest.assets.iter().collect());
    }
    only.iter()
        .map(|name| {
            manifest
                .assets
                .iter()
                .find(|a| &a.name == name)
                .ok_or_else(|| ForgeError::validation(format!("no asset named '{name}'")))
        })
        .collect()
}

fn plan_asset(asset: &AssetSpec, root: &Path, out_dir: &Path, planned: &mut Vec<Planned>) {
    let policy = asset.policy.resolve();
    let expected = asset.size.validate().ok().map(|s| s.frame_bytes());
    let job = |frame: Option<u32>, output: &str, producer: Producer| -> Planned {
        let output_path = normalize_rel_path(output)
            .map(|rel| out_dir.join(rel))
            .map_err(|e| AssetReport::failed(&asset.name, frame, out_dir.join(output), expected, &e))?;
        Ok(Job {
            asset: asset.name.clone(),
            frame,
            output: output_path,
            size: asset.size,
            policy,
            producer,
        })
    };

    match &asset.source {
        AssetSource::Compose(spec) => {
            planned.push(job(None, &asset.output_name(), Producer::Compose(spec.clone())));
        }
        AssetSource::Pattern(spec) => {
            planned.push(job(None, &asset.output_name(), Producer::Pattern(spec.clone())));
        }
        AssetSource::Series(series) => match series.frames(root) {
            Ok(frames) => {
                tracing::debug!(asset = %asset.name, frames = frames.len(), "expanded series");
                for frame in frames {
                    let producer = Producer::Compose(series.composition(&frame));
                    planned.push(job(Some(frame.index), &frame.output, producer));
                }
            }
            Err(e) => planned.push(Err(AssetReport::failed(
                &asset.name,
                None,
                out_dir.join(&series.output),
                expected,
                &e,
            ))),
        },
    }
}

fn run_planned(compositor: &mut Compositor, planned: &Planned) -> AssetReport {
    match planned {
        Ok(job) => run_job(compositor, job),
        Err(report) => report.clone(),
    }
}

#[tracing::instrument(skip_all, fields(asset = %job.asset, frame = ?job.frame))]
fn run_job(compositor: &mut Compositor, job: &Job) -> AssetReport {
    let expected = job.size.validate().ok().map(|s| s.frame_bytes());
    match execute(compositor, job) {
        Ok((written, sha256)) => {
            let status = match written.verify() {
                Ok(()) => AssetStatus::Ok,
                Err(e) => AssetStatus::Warning {
                    kind: e.kind(),
                    message: e.to_string(),
                },
            };
            AssetReport {
                asset: job.asset.clone(),
                frame: job.frame,
                output: job.output.clone(),
                expected_bytes: Some(written.expected_bytes),
                actual_bytes: Some(written.actual_bytes),
                sha256: Some(sha256),
                status,
            }
        }
        Err(e) => AssetReport::failed(&job.asset, job.frame, job.output.clone(), expected, &e),
    }
}

fn execute(
    compositor: &mut Compositor,
    job: &Job,
) -> ForgeResult<(WrittenFrame, String)> {
    let size = job.size.validate()?;
    let canvas = match &job.producer {
        Producer::Compose(spec) => compositor.compose(spec, size)?,
        Producer::Pattern(spec) => spec.generate(size)?,
    };
    let written = write_frame_file(&canvas, job.policy, &job.output)?;
    drop(canvas);

    let bytes = std::fs::read(&written.path)
        .with_context(|| format!("read back '{}'", written.path.display()))?;
    Ok((written, sha256_hex(&bytes)))
}

fn build_thread_pool(threads: Option<usize>) -> ForgeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ForgeError::validation("'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ForgeError::validation(format!("failed to build rayon thread pool: {e}")))
}

/// Lowercase hex SHA-256.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/driver.rs"]
mod tests;
