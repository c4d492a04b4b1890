use std::path::Path;

use anyhow::Context as _;

use crate::{
    compose::{
        model::{Background, CompositionSpec, Resample},
        source::normalize_rel_path,
    },
    foundation::{
        core::Rgb8,
        error::{ForgeError, ForgeResult},
    },
};

/// A run of source frames, converted one artifact per frame.
///
/// Templates use `{i}` for the bare index and `{i:0N}` for a zero-padded one, e.g.
/// `frames/nyan_{i}` or `out/frame_{i:02}.raw`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SeriesSpec {
    /// Where the frames come from.
    #[serde(flatten)]
    pub frames: FrameSource,
    /// First index.
    #[serde(default)]
    pub start: u32,
    /// Numbered sources: candidate extensions, tried in order; the first existing file wins.
    /// Directory sources: the extensions a file must have to be a frame.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Output template relative to the output directory.
    pub output: String,
    /// Resampling filter used to reach the asset size.
    #[serde(default)]
    pub resample: Resample,
    /// Colour transparent source pixels are flattened onto.
    #[serde(default)]
    pub matte: Rgb8,
}

/// Frame enumeration strategy of a series.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum FrameSource {
    /// `count` frames named by an index template.
    Numbered {
        /// Number of frames.
        count: u32,
        /// Source template, without extension when `extensions` is non-empty.
        source: String,
    },
    /// Every matching file in `dir`, sorted by file name and indexed from `start`.
    Directory {
        /// Directory relative to the asset root.
        dir: String,
    },
}

fn default_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "bmp"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// One resolved frame of a series.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeriesFrame {
    /// Frame index.
    pub index: u32,
    /// Resolved source, relative to the asset root. May not exist.
    pub source: String,
    /// Output path relative to the output directory.
    pub output: String,
}

impl SeriesSpec {
    /// Reject series that would be empty or write every frame to the same file.
    pub fn validate(&self) -> ForgeResult<()> {
        match &self.frames {
            FrameSource::Numbered { count, .. } => {
                if *count == 0 {
                    return Err(ForgeError::validation("series count must be > 0"));
                }
                if self.start.checked_add(count - 1).is_none() {
                    return Err(ForgeError::validation("series index range overflows"));
                }
            }
            FrameSource::Directory { dir } => {
                normalize_rel_path(dir)?;
            }
        }
        if !self.output.contains("{i") {
            return Err(ForgeError::validation(format!(
                "series output '{}' needs an index placeholder",
                self.output
            )));
        }
        Ok(())
    }

    /// Resolve every frame in index order.
    ///
    /// A numbered frame with no existing candidate keeps its first candidate so the failure
    /// surfaces as a missing source for that frame alone.
    pub fn frames(&self, root: &Path) -> ForgeResult<Vec<SeriesFrame>> {
        self.validate()?;
        match &self.frames {
            FrameSource::Numbered { count, source } => (self.start..self.start + count)
                .map(|index| {
                    let stem = expand_index(source, index)?;
                    self.frame(index, self.pick_candidate(root, &stem))
                })
                .collect(),
            FrameSource::Directory { dir } => {
                let rel = normalize_rel_path(dir)?;
                let names = self.list_dir(&root.join(&rel))?;
                if names.is_empty() {
                    return Err(ForgeError::validation(format!(
                        "no frames with extensions {:?} in '{dir}'",
                        self.extensions
                    )));
                }
                names
                    .into_iter()
                    .enumerate()
                    .map(|(i, name)| {
                        let index = u32::try_from(i)
                            .ok()
                            .and_then(|i| self.start.checked_add(i))
                            .ok_or_else(|| ForgeError::validation("series index range overflows"))?;
                        self.frame(index, format!("{rel}/{name}"))
                    })
                    .collect()
            }
        }
    }

    /// Conversion of one frame: its source resized onto the whole canvas.
    pub fn composition(&self, frame: &SeriesFrame) -> CompositionSpec {
        CompositionSpec {
            background: Background::Image {
                source: frame.source.clone(),
                resample: self.resample,
                matte: self.matte,
            },
            elements: Vec::new(),
            text: None,
        }
    }

    fn frame(&self, index: u32, source: String) -> ForgeResult<SeriesFrame> {
        Ok(SeriesFrame {
            index,
            source,
            output: expand_index(&self.output, index)?,
        })
    }

    fn pick_candidate(&self, root: &Path, stem: &str) -> String {
        if self.extensions.is_empty() {
            return stem.to_owned();
        }
        let candidates: Vec<String> = self
            .extensions
            .iter()
            .map(|ext| format!("{stem}.{}", ext.trim_start_matches('.')))
            .collect();
        candidates
            .iter()
            .find(|c| normalize_rel_path(c).is_ok_and(|rel| root.join(rel).is_file()))
            .unwrap_or(&candidates[0])
            .clone()
    }

    /// File names in `dir` with an accepted extension, sorted. An empty extension list
    /// accepts every file.
    fn list_dir(&self, dir: &Path) -> ForgeResult<Vec<String>> {
        if !dir.is_dir() {
            return Err(ForgeError::missing_source(dir));
        }
        let accepts = |name: &str| {
            self.extensions.is_empty()
                || Path::new(name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| {
                        self.extensions
                            .iter()
                            .any(|want| want.trim_start_matches('.').eq_ignore_ascii_case(e))
                    })
        };

        let mut names = Vec::new();
        let entries =
            std::fs::read_dir(dir).with_context(|| format!("list frames in '{}'", dir.display()))?;
        for entry in entries {
            let entry = entry.with_context(|| format!("list frames in '{}'", dir.display()))?;
            if !entry.path().is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                tracing::warn!(path = %entry.path().display(), "skipping non-UTF-8 frame name");
                continue;
            };
            if accepts(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Digits in `u32::MAX`; wider padding is rejected.
const MAX_INDEX_WIDTH: usize = 10;

/// Substitute every `{i}` / `{i:0N}` placeholder in `template` with `index`.
pub fn expand_index(template: &str, index: u32) -> ForgeResult<String> {
    let mut out = String::with_capacity(template.len() + 4);
    let mut rest = template;
    while let Some(start) = rest.find("{i") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| {
            ForgeError::validation(format!("unterminated placeholder in '{template}'"))
        })?;
        let spec = &after[..end];
        let width = match spec {
            "" => 0,
            _ => spec
                .strip_prefix(":0")
                .and_then(|w| w.parse::<usize>().ok())
                .filter(|w| *w <= MAX_INDEX_WIDTH)
                .ok_or_else(|| {
                    ForgeError::validation(format!(
                        "unsupported placeholder '{{i{spec}}}' in '{template}' \
                         (padding is at most {MAX_INDEX_WIDTH} digits)"
                    ))
                })?,
        };
        out.push_str(&format!("{index:0width$}"));
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/series.rs"]
mod tests;
