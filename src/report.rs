//! Static HTML report of the kept lots, with a countdown to the next run.

use chrono::{DateTime, Days, TimeZone};
use std::fs;
use std::path::Path;

use crate::error::RunError;
use crate::results::LotRecord;

/// Descriptions longer than this are shortened in the report
pub const MAX_DESCRIPTION_CHARS: usize = 450;

/// Values the page header and footer need besides the records
#[derive(Debug, Clone)]
pub struct ReportContext<Tz: TimeZone> {
    pub title: String,
    pub source_url: String,
    pub generated_at: DateTime<Tz>,
    pub next_run: DateTime<Tz>,
    /// Human-readable zone name shown next to the timestamps
    pub zone_name: String,
    pub run_hour: u32,
}

/// Next occurrence of `hour:00:00` strictly after `now`, in `now`'s timezone
pub fn next_run<Tz: TimeZone>(now: &DateTime<Tz>, hour: u32) -> Option<DateTime<Tz>> {
    let tz = now.timezone();
    let today = now.date_naive();
    (0..=2u64).find_map(|offset| {
        let day = today.checked_add_days(Days::new(offset))?;
        let local = day.and_hms_opt(hour, 0, 0)?;
        tz.from_local_datetime(&local)
            .earliest()
            .filter(|candidate| candidate > now)
    })
}

/// Escapes text for use in element content and quoted attributes
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn shorten(text: &str) -> String {
    if text.chars().count() > MAX_DESCRIPTION_CHARS {
        let mut cut: String = text.chars().take(MAX_DESCRIPTION_CHARS - 1).collect();
        cut.push('…');
        cut
    } else {
        text.to_string()
    }
}

fn render_card(item: &LotRecord) -> String {
    let url = escape_html(&item.url);
    let title = escape_html(&item.title);

    let thumb = if item.image.is_empty() {
        r#"<div class="noimg">Pas d'image</div>"#.to_string()
    } else {
        format!(r#"<img src="{}" alt="{}">"#, escape_html(&item.image), title)
    };

    let description = if item.description.is_empty() {
        String::new()
    } else {
        format!("<p>{}</p>", escape_html(&shorten(&item.description)))
    };

    format!(
        r#"
<article class="lot">
  <a class="thumb" href="{url}" target="_blank" rel="noopener">
    {thumb}
  </a>
  <div class="content">
    <h3><a href="{url}" target="_blank" rel="noopener">{title}</a></h3>
    {description}
  </div>
</article>"#
    )
}

const STYLE: &str = r#"body{font-family:system-ui,-apple-system,Segoe UI,Roboto,Arial,sans-serif;max-width:1100px;margin:2rem auto;padding:0 1rem;background:#f6f7f9}
header{display:flex;flex-direction:column;gap:.4rem}
.topline{display:flex;align-items:center;justify-content:space-between}
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(280px,1fr));gap:16px;margin-top:1rem}
article.lot{background:#fff;border:1px solid #e7e9ee;border-radius:8px;overflow:hidden;display:flex;flex-direction:column}
.thumb{display:block;aspect-ratio:4/3;background:#eee;overflow:hidden}
img{width:100%;height:100%;object-fit:cover;display:block}
.noimg{display:flex;align-items:center;justify-content:center;height:160px;color:#777}
.content{padding:12px}
h1{font-size:1.4rem;margin:0}
h3{margin:.2rem 0;font-size:1rem}
p{margin:.3rem 0 .6rem 0;color:#333;line-height:1.35}
.badge{border:1px solid #e0e0e0;border-radius:999px;padding:.2rem .6rem;font-size:.85rem}
.countdown{font-variant-numeric:tabular-nums}
footer{margin:2rem 0;color:#666;font-size:.85rem}"#;

const COUNTDOWN_SCRIPT: &str = r#"  const el = document.getElementById('countdown');
  const pad = n=>String(n).padStart(2,'0');
  function tick(){
    const now = new Date();
    let diff = Math.max(0, Math.floor((target-now)/1000));
    const h = Math.floor(diff/3600), m = Math.floor((diff%3600)/60), s = diff%60;
    el.textContent = pad(h)+":"+pad(m)+":"+pad(s);
  }
  tick(); setInterval(tick,1000);"#;

/// Renders the full report page
pub fn render<Tz: TimeZone>(items: &[LotRecord], ctx: &ReportContext<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let cards = if items.is_empty() {
        "<p>Aucun lot correspondant trouvé.</p>".to_string()
    } else {
        items.iter().map(render_card).collect::<Vec<_>>().join("\n")
    };

    let title = escape_html(&ctx.title);
    let source = escape_html(&ctx.source_url);
    let zone = escape_html(&ctx.zone_name);
    let generated = ctx.generated_at.format("%Y-%m-%d %H:%M:%S");
    let next_local = ctx.next_run.format("%d/%m/%Y %H:%M");
    // JSON string literal; a '<' can never appear in an RFC 3339 timestamp
    let next_iso = serde_json::Value::String(ctx.next_run.to_rfc3339()).to_string();
    let count = items.len();
    let run_hour = ctx.run_hour;

    format!(
        r#"<!doctype html>
<html lang="fr"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>{title}</title>
<style>
{STYLE}
</style></head>
<body>
<header>
  <div class="topline"><h1>{title}</h1><div class="badge">{count} lots</div></div>
  <small>Généré le {generated} ({zone}). Prochaine exécution à <strong>{next_local}</strong> — départ dans <strong id="countdown" class="countdown">--:--:--</strong>.</small>
</header>
<section class="grid">
{cards}
</section>
<footer>
  <p>Source : <a href="{source}" target="_blank" rel="noopener">{source}</a>. Page régénérée automatiquement chaque jour à {run_hour:02}:00 ({zone}).</p>
</footer>
<script>
(function(){{
  const target = new Date({next_iso});
{COUNTDOWN_SCRIPT}
}})();
</script>
</body></html>"#
    )
}

/// Writes `contents` to `path`, creating parent directories and replacing any previous file
pub fn write_artifact(path: &Path, contents: &str) -> Result<(), RunError> {
    let to_err = |source| RunError::Write {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(to_err)?;
    }
    fs::write(path, contents).map_err(to_err)
}

/// Dumps the kept records as pretty-printed JSON
pub fn write_json(path: &Path, items: &[LotRecord]) -> Result<(), RunError> {
    let json = serde_json::to_string_pretty(items).map_err(|e| RunError::Write {
        path: path.display().to_string(),
        source: e.into(),
    })?;
    write_artifact(path, &json)
}
