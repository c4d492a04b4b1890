use std::{
    collections::HashSet,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::{
    color::policy::PolicySpec,
    compose::model::CompositionSpec,
    foundation::{
        core::Dimensions,
        error::{ForgeError, ForgeResult},
    },
    pattern::PatternSpec,
    pipeline::series::SeriesSpec,
};

/// Build manifest: the persisted list of asset build rules.
///
/// Every artifact carries its own size and colour format policy; there are no global
/// conventions.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Manifest {
    /// Asset root for relative sources; relative to the manifest directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// Output directory; relative to the manifest directory. Defaults to the asset root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
    /// Assets in build/report order.
    pub assets: Vec<AssetSpec>,
    #[serde(skip)]
    base_dir: PathBuf,
}

/// One build rule.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AssetSpec {
    /// Unique name used in status lines.
    pub name: String,
    /// Output file relative to the output directory. Defaults to `<name>.raw`; ignored for
    /// series, which name their own frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Target canvas size.
    pub size: Dimensions,
    /// At-rest encoding.
    #[serde(default)]
    pub policy: PolicySpec,
    /// What fills the canvas.
    #[serde(flatten)]
    pub source: AssetSource,
}

/// Canvas producer for an asset.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetSource {
    /// Layered composition.
    Compose(CompositionSpec),
    /// Procedural pattern.
    Pattern(PatternSpec),
    /// Numbered frame series, one artifact per frame.
    Series(SeriesSpec),
}

impl AssetSource {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Compose(_) => "compose",
            Self::Pattern(p) => p.kind(),
            Self::Series(_) => "series",
        }
    }
}

impl AssetSpec {
    /// Output path relative to the output directory.
    pub fn output_name(&self) -> String {
        self.output
            .clone()
            .unwrap_or_else(|| format!("{}.raw", self.name))
    }
}

impl Manifest {
    /// Manifest with the given assets, resolving relative paths against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>, assets: Vec<AssetSpec>) -> Self {
        Self {
            root: None,
            out_dir: None,
            assets,
            base_dir: base_dir.into(),
        }
    }

    /// Parse a manifest from a JSON reader. Relative paths resolve against the current
    /// directory.
    pub fn from_reader<R: std::io::Read>(r: R) -> ForgeResult<Self> {
        let manifest: Self = serde_json::from_reader(r)
            .map_err(|e| ForgeError::serde(format!("parse manifest JSON: {e}")))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse a manifest file. Relative paths resolve against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> ForgeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ForgeError::validation(format!("open manifest '{}': {e}", path.display()))
        })?;
        let mut manifest = Self::from_reader(BufReader::new(f))?;
        manifest.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(manifest)
    }

    /// Directory relative paths resolve against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolved asset root.
    pub fn root_dir(&self) -> PathBuf {
        match &self.root {
            Some(r) => self.base_dir.join(r),
            None => self.base_dir.clone(),
        }
    }

    /// Resolved output directory.
    pub fn output_dir(&self) -> PathBuf {
        match &self.out_dir {
            Some(o) => self.base_dir.join(o),
            None => self.root_dir(),
        }
    }

    /// Structural checks that apply to the whole manifest. Per-asset problems such as bad
    /// dimensions are reported per asset at build time instead.
    pub fn validate(&self) -> ForgeResult<()> {
        let mut seen = HashSet::new();
        for asset in &self.assets {
            if asset.name.trim().is_empty() {
                return Err(ForgeError::validation("asset name must be non-empty"));
            }
            if !seen.insert(asset.name.as_str()) {
                return Err(ForgeError::validation(format!(
                    "duplicate asset name '{}'",
                    asset.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/manifest.rs"]
mod tests;
