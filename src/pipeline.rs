//! The seam between the relay and the rigging pipeline it drives.
//!
//! The pipeline and its result record are supplied by the host process. The
//! relay only builds the options, runs the pipeline to completion and reads
//! the two output paths the pipeline leaves behind on the record.

use std::path::{Path, PathBuf};
use tokio::fs;

/// The record a pipeline run writes its outputs into.
pub trait RigRecord: Send + Sync + 'static {
    /// The packaged preview output (a `.glb`), if the pipeline produced one.
    fn anim_vis_path(&self) -> Option<&Path>;
    /// The native-format output (an `.fbx`), if the pipeline produced one.
    fn anim_path(&self) -> Option<&Path>;
}

/// A rigging pipeline supplied by the host process.
///
/// `run` is a blocking call; the relay executes it on tokio's blocking pool
/// and only inspects `record` once it has returned.
pub trait RigPipeline: Send + Sync + 'static {
    /// The record type this pipeline fills in.
    type Record: RigRecord;

    /// Rigs (and optionally animates) the model described by `options`.
    fn run(&self, options: &RigOptions, record: &mut Self::Record) -> anyhow::Result<()>;
}

/// A plain result record for pipelines without a record type of their own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RigOutputs {
    pub anim_vis_path: Option<PathBuf>,
    pub anim_path: Option<PathBuf>,
}

impl RigRecord for RigOutputs {
    fn anim_vis_path(&self) -> Option<&Path> {
        self.anim_vis_path.as_deref()
    }

    fn anim_path(&self) -> Option<&Path> {
        self.anim_path.as_deref()
    }
}

/// The configuration handed to the pipeline for one request.
///
/// Only `input_path`, `animation_file` and `original_filename` vary between
/// requests; everything else is fixed by [`RigOptions::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct RigOptions {
    pub input_path: PathBuf,
    pub is_gs: bool,
    pub opacity_threshold: f32,
    pub no_fingers: bool,
    pub rest_pose_type: String,
    pub ignore_pose_parts: Vec<String>,
    pub input_normal: bool,
    pub bw_fix: bool,
    pub bw_vis_bone: String,
    pub reset_to_rest: bool,
    pub animation_file: Option<PathBuf>,
    pub retarget: bool,
    pub inplace: bool,
    pub export_temp: bool,
    pub original_filename: String,
}

impl RigOptions {
    pub fn new(
        input_path: PathBuf,
        original_filename: impl Into<String>,
        animation_file: Option<PathBuf>,
    ) -> Self {
        Self {
            input_path,
            is_gs: false,
            opacity_threshold: 0.01,
            no_fingers: true,
            rest_pose_type: "No".to_string(),
            ignore_pose_parts: Vec::new(),
            input_normal: false,
            bw_fix: true,
            bw_vis_bone: "LeftArm".to_string(),
            reset_to_rest: true,
            animation_file,
            retarget: true,
            inplace: true,
            export_temp: true,
            original_filename: original_filename.into(),
        }
    }
}

/// Which of the record's outputs was picked for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Preview,
    Native,
}

/// The file chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedOutput {
    pub path: PathBuf,
    pub kind: OutputKind,
}

/// Picks the file to upload from a finished record.
///
/// The preview output wins whenever it names an existing file; the native
/// output is only considered otherwise. Returns `None` if neither exists.
pub async fn select_output<R: RigRecord + ?Sized>(record: &R) -> Option<SelectedOutput> {
    if let Some(path) = record.anim_vis_path() {
        if is_file(path).await {
            return Some(SelectedOutput {
                path: path.to_path_buf(),
                kind: OutputKind::Preview,
            });
        }
    }

    if let Some(path) = record.anim_path() {
        if is_file(path).await {
            return Some(SelectedOutput {
                path: path.to_path_buf(),
                kind: OutputKind::Native,
            });
        }
    }

    None
}

pub(crate) async fn is_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
