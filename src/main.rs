use anyhow::{bail, Context, Result};
use rosterize::{calendar::NoCalendar, rules::store::RuleStore, schedule};
use std::{env, fs};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // ─── 2) parse arguments ──────────────────────────────────────────
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 {
        bail!("usage: rosterize <rows.json> <name> [year] [month]");
    }
    let rows_path = &args[0];
    let target_name = &args[1];
    let year = args
        .get(2)
        .map(|s| s.parse::<i32>().with_context(|| format!("invalid year {:?}", s)))
        .transpose()?;
    let month = args
        .get(3)
        .map(|s| s.parse::<u32>().with_context(|| format!("invalid month {:?}", s)))
        .transpose()?;

    // ─── 3) load decoded roster rows ─────────────────────────────────
    let text =
        fs::read_to_string(rows_path).with_context(|| format!("reading {}", rows_path))?;
    let rows: Vec<Vec<String>> =
        serde_json::from_str(&text).with_context(|| format!("parsing rows from {}", rows_path))?;
    info!(rows = rows.len(), "loaded roster rows");

    // ─── 4) load substitution rules ──────────────────────────────────
    let rules_dir = env::var("ROSTERIZE_RULES_DIR").unwrap_or_else(|_| "rules".to_string());
    let store = RuleStore::new(&rules_dir)?;
    let rules = store.load_or_default()?;
    info!(rules = rules.len(), dir = %rules_dir, "loaded substitution rules");

    // ─── 5) aggregate ────────────────────────────────────────────────
    let schedule = schedule::process(&rows, target_name, year, month, &rules, &NoCalendar)?;

    // ─── 6) print sorted schedule, then remarks ──────────────────────
    for (date, entry) in &schedule.entries {
        println!("{}\t{}\t{}", date, entry.weekday, entry.content);
    }
    if !schedule.remarks.is_empty() {
        warn!(count = schedule.remarks.len(), "rows left as remarks");
        for remark in &schedule.remarks {
            println!("remark\t{}", remark);
        }
    }
    info!(
        entries = schedule.entries.len(),
        remarks = schedule.remarks.len(),
        "done"
    );

    Ok(())
}
