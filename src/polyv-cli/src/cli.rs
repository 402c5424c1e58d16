//! CLI argument definitions for polyv
//!
//! All clap-derived structs and enums for CLI parsing. Defaults follow the
//! conventional `res/` layout next to the working directory.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "polyv")]
#[command(about = "Multilingual voice mod manifest tools", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter manifests down to the languages you opt into, with backups and
    /// a JSON report
    Filter(FilterArgs),

    /// Merge a base dataset with an extension dataset (base wins)
    Fuse(FuseArgs),

    /// Retarget pseudo-tag attributes to each entry's reference language
    Retag(RetagArgs),

    /// Remove the translation effect for selected languages
    StripEffect(StripArgs),

    /// Swap gendered voice fields (voice reassignment)
    SwapVoice(SwapArgs),
}

#[derive(clap::Args)]
pub struct FilterArgs {
    /// CDT detail document
    #[arg(long, default_value = "res/CVLPV_cdt_data.json")]
    pub cdt: PathBuf,

    /// CNC detail document
    #[arg(long, default_value = "res/CVLPV_cnc_data.json")]
    pub cnc: PathBuf,

    /// Name -> Ids index document
    #[arg(long, default_value = "res/CVLPV_id_info.json")]
    pub info: PathBuf,

    /// Where to write the filter report
    #[arg(long, default_value = "res/CVLPV_filter_report.json")]
    pub report: PathBuf,

    /// Directory receiving the pre-filter originals
    #[arg(long, default_value = "res/backup_originals")]
    pub backup_dir: PathBuf,

    /// Languages config file (falls back to built-in jpn/mex)
    #[arg(long, default_value = "res/CVLPV_languages_config.json")]
    pub config: PathBuf,

    /// Sort object keys in all written JSON
    #[arg(long)]
    pub sort_keys: bool,
}

#[derive(clap::Args)]
pub struct FuseArgs {
    #[arg(long, default_value = "res/CVL_cnc_data.json")]
    pub base_cnc: PathBuf,

    #[arg(long, default_value = "res/PV_cnc_data.json")]
    pub extra_cnc: PathBuf,

    #[arg(long, default_value = "res/CVLPV_cnc_data.json")]
    pub out_cnc: PathBuf,

    #[arg(long, default_value = "res/CVL_cdt_data.json")]
    pub base_cdt: PathBuf,

    #[arg(long, default_value = "res/PV_cdt_data.json")]
    pub extra_cdt: PathBuf,

    #[arg(long, default_value = "res/CVLPV_cdt_data.json")]
    pub out_cdt: PathBuf,

    /// Base name -> Ids index (id-list union merge; all three flags or none)
    #[arg(long, requires_all = ["extra_info", "out_info"])]
    pub base_info: Option<PathBuf>,

    #[arg(long, requires_all = ["base_info", "out_info"])]
    pub extra_info: Option<PathBuf>,

    #[arg(long, requires_all = ["base_info", "extra_info"])]
    pub out_info: Option<PathBuf>,

    /// Per-ID merge log
    #[arg(long, default_value = "logFusion.txt")]
    pub log: PathBuf,
}

#[derive(clap::Args)]
pub struct RetagArgs {
    /// Detail documents to patch in place
    #[arg(default_values = ["res/CVLPV_cnc_data.json", "res/CVLPV_cdt_data.json"])]
    pub files: Vec<PathBuf>,

    #[arg(long, default_value = "logKTE.txt")]
    pub log: PathBuf,
}

#[derive(clap::Args)]
pub struct StripArgs {
    /// Detail documents to patch in place (missing files are skipped)
    #[arg(default_values = [
        "res/CNC_cdt_data.json",
        "res/CNC_cnc_data.json",
        "res/CVLPV_cnc_data.json",
        "res/CVLPV_cdt_data.json",
    ])]
    pub files: Vec<PathBuf>,

    #[arg(long, default_value = "logKTEr.txt")]
    pub log: PathBuf,
}

#[derive(clap::Args)]
pub struct SwapArgs {
    /// Documents where every ID is swapped
    #[arg(long = "all", default_values = ["res/CVLPV_cnc_data.json", "res/CVLPV_cdt_data.json"])]
    pub all_files: Vec<PathBuf>,

    /// Documents where only NPC-prefix-matching IDs are swapped
    #[arg(long = "filtered", default_values = ["res/CNC_cnc_data.json", "res/CNC_cdt_data.json"])]
    pub filtered_files: Vec<PathBuf>,

    /// NPC name prefix used for the filtered documents
    #[arg(long, default_value = "PolyglotV_")]
    pub npc_prefix: String,

    /// NPC info document annotated after the swap
    #[arg(long, default_value = "res/CVLPV_npc_info.json")]
    pub npc_info: PathBuf,

    #[arg(long, default_value = "logTVMV.txt")]
    pub log: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuse_info_flags_are_all_or_nothing() {
        // A partial trio would silently skip the id-info merge; reject it.
        assert!(Cli::try_parse_from([
            "polyv", "fuse", "--extra-info", "x.json", "--out-info", "y.json",
        ])
        .is_err());
        assert!(Cli::try_parse_from(["polyv", "fuse", "--base-info", "b.json"]).is_err());
        assert!(Cli::try_parse_from(["polyv", "fuse", "--out-info", "y.json"]).is_err());

        assert!(Cli::try_parse_from(["polyv", "fuse"]).is_ok());
        assert!(Cli::try_parse_from([
            "polyv", "fuse",
            "--base-info", "b.json",
            "--extra-info", "x.json",
            "--out-info", "y.json",
        ])
        .is_ok());
    }
}
