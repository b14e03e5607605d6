use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use stimband_app::{
    BandReportRequest, BandReportUseCase, QuadrantRequest, QuadrantUseCase, ScaleLabels,
};
use stimband_domain::GroupingError;
use stimband_ingest::{
    parse_item_associations, parse_stat_dict, scales_by_question, stimulus_means,
    viewpoint_averaged_means,
};
use stimband_types::{BandScale, QuadrantPolicy};

#[derive(Debug, Parser)]
#[command(
    name = "stimband",
    version,
    about = "Band and quadrant grouping reports for stimulus rating statistics"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Group stimuli into ordinal bands and emit the sorted value report.
    BandReport {
        /// Stat dictionary (JSON: question -> stimulus -> observations)
        #[arg(long)]
        stats: PathBuf,

        /// Wording of the scale's low endpoint, e.g. "Not possible at all"
        #[arg(long)]
        min_label: String,

        /// Wording of the scale's high endpoint
        #[arg(long)]
        max_label: String,

        /// Average all viewpoints of a question into one entry
        #[arg(long, default_value_t = false)]
        viewpoint_avg: bool,

        /// Item-question association (JSON); annotates entries with scale names
        #[arg(long, requires = "viewpoint_avg")]
        scales: Option<PathBuf>,

        /// Output report path (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also write the report envelope as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Pretty-print JSON
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },

    /// Cross-tabulate two statistics into bivariate quadrants.
    Quadrants {
        /// Stat dictionary for the first axis (JSON)
        #[arg(long)]
        primary: PathBuf,

        /// Stat dictionary for the second axis (JSON)
        #[arg(long)]
        secondary: PathBuf,

        /// Display name of the first statistic, e.g. "Poss"
        #[arg(long)]
        primary_name: String,

        /// Display name of the second statistic, e.g. "real"
        #[arg(long)]
        secondary_name: String,

        /// Grouping policy
        #[arg(long, value_enum, default_value_t = PolicyArg::Extremes)]
        policy: PolicyArg,

        /// Output report path (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also write the grouping envelope as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Pretty-print JSON
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum PolicyArg {
    /// Extreme thirds only: high > 3.66, low < 2.34, middle discarded
    Extremes,

    /// Full split at the midpoint: high > 3, low <= 3
    Full,
}

impl From<PolicyArg> for QuadrantPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Extremes => QuadrantPolicy::extremes_only(),
            PolicyArg::Full => QuadrantPolicy::full_split(),
        }
    }
}

fn main() -> ExitCode {
    if let Err(err) = real_main() {
        eprintln!("{err:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::BandReport {
            stats,
            min_label,
            max_label,
            viewpoint_avg,
            scales,
            out,
            json,
            pretty,
        } => {
            let dict = parse_stat_dict(&read_bytes(&stats)?)
                .with_context(|| format!("parse stat dictionary {}", stats.display()))?;

            let stats = if viewpoint_avg {
                viewpoint_averaged_means(&dict)?
            } else {
                stimulus_means(&dict)?
            };

            let annotations = match scales {
                Some(path) => {
                    let keys = parse_item_associations(&read_bytes(&path)?)
                        .with_context(|| format!("parse associations {}", path.display()))?;
                    Some(scales_by_question(keys.iter().map(String::as_str))?)
                }
                None => None,
            };

            let outcome = BandReportUseCase::execute(BandReportRequest {
                stats,
                scale: BandScale::default(),
                labels: ScaleLabels {
                    min_label,
                    max_label,
                },
                annotations,
            });

            emit(out.as_deref(), &outcome.text)?;
            if let Some(path) = json {
                write_json(&path, &outcome.report, pretty)?;
            }
            Ok(())
        }

        Command::Quadrants {
            primary,
            secondary,
            primary_name,
            secondary_name,
            policy,
            out,
            json,
            pretty,
        } => {
            let primary_dict = parse_stat_dict(&read_bytes(&primary)?)
                .with_context(|| format!("parse stat dictionary {}", primary.display()))?;
            let secondary_dict = parse_stat_dict(&read_bytes(&secondary)?)
                .with_context(|| format!("parse stat dictionary {}", secondary.display()))?;

            let outcome = QuadrantUseCase::execute(QuadrantRequest {
                primary_name,
                secondary_name,
                primary: stimulus_means(&primary_dict)?,
                secondary: stimulus_means(&secondary_dict)?,
                policy: policy.into(),
            })
            .map_err(map_grouping_err)?;

            emit(out.as_deref(), &outcome.text)?;
            if let Some(path) = json {
                write_json(&path, &outcome.grouping, pretty)?;
            }
            Ok(())
        }
    }
}

fn map_grouping_err(err: anyhow::Error) -> anyhow::Error {
    // Keep integrity failures easy to read in batch logs.
    if let Some(e) = err.downcast_ref::<GroupingError>() {
        return anyhow::anyhow!("malformed dataset: {e}");
    }
    err
}

fn read_bytes(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("read {}", path.display()))
}

fn emit(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => atomic_write(path, text.as_bytes()),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T, pretty: bool) -> anyhow::Result<()> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(value)?
    } else {
        serde_json::to_vec(value)?
    };
    atomic_write(path, &bytes)
}

fn atomic_write(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
    }

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = parent.to_path_buf();
    tmp.push(format!(".{}.tmp", uuid::Uuid::new_v4()));

    {
        let mut f =
            fs::File::create(&tmp).with_context(|| format!("create temp {}", tmp.display()))?;
        f.write_all(bytes)
            .with_context(|| format!("write temp {}", tmp.display()))?;
        f.sync_all().ok();
    }

    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
